use crate::{compile::Code, util::maps::FrameMap};
use color_print::{ceprint, ceprintln};

/// Print a colored assembly listing to stderr.
pub fn print_listing(code: &Code) {
    for (no, line) in code.0.iter().enumerate() {
        ceprintln!("<dim>{:>5}</dim> {}", no + 1, line.cformat());
    }
}

/// Print the frame of every function to stderr.
pub fn print_frames(map: &FrameMap) {
    eprintln!("+-[Globals]-----------------------------------------------------");
    for (name, size) in &map.globals {
        ceprintln!("| <cyan>{}</cyan> : {} bytes", name, size);
    }
    for (name, entry) in &map.functions {
        eprintln!("+---------------------------------------------------------------");
        ceprintln!("| <green>{}</green> : frame {} bytes", name, entry.frame_size);
        for slot in entry.params.iter().chain(&entry.locals) {
            ceprint!("|   {:>5}(%rbx) ", slot.offset);
            ceprintln!(
                "<yellow>{}</yellow> depth {} size {}",
                slot.name,
                slot.depth,
                slot.size
            );
        }
    }
    eprintln!("+---------------------------------------------------------------");
}
