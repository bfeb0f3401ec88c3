use bplc::{
    ast::Ast,
    compile::{data, text, Labels},
    util::display::{print_frames, print_listing},
    Config, Error, FrameMap, Scope,
};
use clap::Parser;
use color_print::ceprintln;
use std::fs::File;
use std::io::{self, Write};

#[derive(Debug, clap::Parser)]
#[clap(author, version, about)]
struct Args {
    /// Input AST (YAML)
    #[clap(default_value = "main.ast.yaml")]
    input: String,

    /// Output file [default: stdout]
    #[clap(short, long)]
    output: Option<String>,

    /// Configuration file (YAML)
    #[clap(short, long)]
    config: Option<String>,

    /// End the scope of a local at the end of its block
    #[clap(long)]
    block_scope: bool,

    /// Write the frame map (YAML) to this file
    #[clap(short, long)]
    map: Option<String>,

    /// Enable verbose output
    #[clap(short, long)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();
    if let Err(e) = run(&args) {
        e.print_diag(&args.input);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), Error> {
    let step = |no: usize, msg: &str| {
        if args.verbose {
            ceprintln!("<cyan>{}.</cyan> {}", no, msg);
        }
    };

    // 1. Load configuration and AST
    step(1, "Load AST");
    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if args.block_scope {
        config.scope = Scope::Block;
    }
    let file = File::open(&args.input).map_err(|e| Error::FileOpen(args.input.clone(), e))?;
    let mut ast: Ast = serde_yaml::from_reader(file)?;

    // 2. Resolve identifiers and check types
    step(2, "Resolve");
    bplc::resolve(&mut ast, &config)?;

    // 3. Assign stack slots
    step(3, "Lay out frames");
    bplc::layout(&mut ast);
    if args.verbose || args.map.is_some() {
        let map = FrameMap::generate(&ast);
        if let Some(path) = &args.map {
            std::fs::write(path, map.to_yaml()?)
                .map_err(|e| Error::FileCreate(path.clone(), e))?;
        }
        if args.verbose {
            print_frames(&map);
        }
    }

    // 4. Generate assembly
    step(4, "Generate");
    let mut labels = Labels::new();
    let (data, strings) = data::section(&ast, &mut labels)?;
    let text = text(&ast, &strings, &mut labels);

    // 5. Write output. The data section is written even without a main.
    step(5, "Write output");
    let mut out: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(File::create(path).map_err(|e| Error::FileCreate(path.clone(), e))?),
        None => Box::new(io::stdout().lock()),
    };
    data.write(&mut out)?;
    let text = text?;
    text.write(&mut out)?;
    out.flush()?;

    if args.verbose {
        print_listing(&data);
        print_listing(&text);
    }
    Ok(())
}
