mod common;

use bplc::ast::{build::*, *};
use bplc::{compile, generate, layout, Config, Error, Labels};
use common::*;

fn asm(mut ast: Ast) -> String {
    let asm = compile(&mut ast, &Config::default()).unwrap();
    println!("{}", asm);
    asm
}

fn assert(ast: Ast, expect: &str) {
    let asm = asm(ast);
    assert!(asm.contains(expect), "missing:\n{}", expect);
}

macro_rules! case {
    ($name:ident, $ast:expr, $expect:expr) => {
        #[test]
        fn $name() {
            assert($ast, $expect);
        }
    };
}

case!(
    prologue,
    prog(vec![], vec![]),
    "main:\n    movq %rsp, %rbx\n    movq %rbx, %rsp\n    ret\n"
);
case!(
    prologue_reserves_frame,
    {
        let mut ast = Ast::new();
        let inner = block(&mut ast, vec![int("t")], vec![]);
        main_with(&mut ast, vec![int("x")], vec![Stmt::block(inner)]);
        ast
    },
    "main:\n    movq %rsp, %rbx\n    subq $16, %rsp\n    subq $8, %rsp\n    subq $8, %rsp\n    addq $8, %rsp\n    addq $8, %rsp\n    movq %rbx, %rsp\n    ret\n"
);
case!(
    scalar_local,
    prog(vec![int("x")], vec![Stmt::expr(set("x", num(5)))]),
    "    subq $8, %rsp\n    movq $5, %rax\n    movq %rax, -8(%rbx)\n    addq $8, %rsp\n"
);
case!(
    global_store,
    {
        let mut ast = Ast::new();
        ast.global(Decl::var(1, Base::Int, "g"));
        main_with(&mut ast, vec![], vec![Stmt::expr(set("g", num(1)))]);
        ast
    },
    "    movq $1, %rax\n    movq %rax, g(%rip)\n"
);
case!(
    global_storage,
    {
        let mut ast = Ast::new();
        ast.global(Decl::var(1, Base::Int, "g"));
        ast.global(Decl::array(1, Base::Int, "a", 10));
        ast.global(Decl::pointer(1, Base::String, "p"));
        main_with(&mut ast, vec![], vec![]);
        ast
    },
    ".comm g, 8, 32\n.comm a, 80, 32\n.comm p, 8, 32\n"
);
case!(
    subtraction_evaluates_right_first,
    prog(vec![], vec![Stmt::write(sub(num(7), num(2)))]),
    "    movq $2, %rax\n    pushq %rax\n    movq $7, %rax\n    subl 0(%rsp), %eax\n    addq $8, %rsp\n"
);
case!(
    multiplication,
    prog(vec![], vec![Stmt::write(mul(num(7), num(2)))]),
    "    movq $7, %rax\n    imull 0(%rsp), %eax\n    addq $8, %rsp\n"
);
case!(
    remainder,
    prog(vec![], vec![Stmt::write(rem(num(7), num(2)))]),
    "    movq $2, %rax\n    pushq %rax\n    movq $7, %rax\n    popq %rcx\n    cltq\n    cqto\n    idivl %ecx\n    movl %edx, %eax\n"
);
case!(
    negation,
    prog(vec![], vec![Stmt::write(neg(num(3)))]),
    "    movq $3, %rax\n    negl %eax\n"
);
case!(
    less_than,
    prog(
        vec![],
        vec![Stmt::if_(cmp(num(1), RelOp::Lt, num(2)), Stmt::writeln(), None)]
    ),
    ".L0:\n    movq $2, %rax\n    pushq %rax\n    movq $1, %rax\n    cmpl 0(%rsp), %eax\n    jge .L3\n    movl $1, %eax\n    jmp .L4\n.L3:\n    movl $0, %eax\n.L4:\n    addq $8, %rsp\n    cmpl $0, %eax\n    je .L1\n"
);
case!(
    if_else_layout,
    prog(
        vec![],
        vec![Stmt::if_(num(1), Stmt::writeln(), Some(Stmt::empty()))]
    ),
    "    movq 8(%rsp), %rsp\n    jmp .L2\n.L1:\n.L2:\n"
);
case!(
    while_loop,
    prog(vec![], vec![Stmt::while_(num(0), Stmt::empty())]),
    ".L0:\n    movq $0, %rax\n    cmpl $0, %eax\n    je .L1\n    jmp .L0\n.L1:\n"
);
case!(
    write_int,
    prog(vec![], vec![Stmt::write(num(4))]),
    "    movq $4, %rax\n    movl %eax, %esi\n    leaq .WriteIntString(%rip), %rdi\n    movl $0, %eax\n    pushq %rsp\n    pushq 0(%rsp)\n    andq $-16, %rsp\n    call printf@PLT\n    movq 8(%rsp), %rsp\n"
);
case!(
    write_string,
    prog(vec![], vec![Stmt::write(string("hi"))]),
    "    leaq .S0(%rip), %rax\n    movq %rax, %rsi\n    leaq .WriteStringString(%rip), %rdi\n"
);
case!(
    writeln,
    prog(vec![], vec![Stmt::writeln()]),
    "    leaq .WritelnString(%rip), %rdi\n    movl $0, %eax\n"
);
case!(
    read_int,
    prog(vec![int("x")], vec![Stmt::expr(set("x", read()))]),
    "    subq $8, %rsp\n    movq %rsp, %rsi\n    leaq .ReadIntString(%rip), %rdi\n    movl $0, %eax\n    pushq %rsp\n    pushq 0(%rsp)\n    andq $-16, %rsp\n    call scanf@PLT\n    movq 8(%rsp), %rsp\n    movl 0(%rsp), %eax\n    addq $8, %rsp\n    movq %rax, -8(%rbx)\n"
);
case!(
    local_array_store,
    prog(vec![int_array("a", 3)], vec![Stmt::expr(set_index("a", num(1), num(5)))]),
    "    movq $5, %rax\n    pushq %rax\n    leaq -24(%rbx), %rax\n    pushq %rax\n    movq $1, %rax\n    cltq\n    imulq $8, %rax\n    popq %rsi\n    addq %rax, %rsi\n    popq %rax\n    movq %rax, 0(%rsi)\n"
);
case!(
    local_array_load,
    prog(vec![int_array("a", 3)], vec![Stmt::write(index("a", num(2)))]),
    "    popq %rsi\n    addq %rax, %rsi\n    movq 0(%rsi), %rax\n"
);
case!(
    address_and_deref,
    prog(
        vec![int("x"), int_ptr("p")],
        vec![
            Stmt::expr(set("p", addr(var("x")))),
            Stmt::write(deref(var("p"))),
        ]
    ),
    "    leaq -8(%rbx), %rax\n    movq %rax, -16(%rbx)\n    movq -16(%rbx), %rax\n    movq 0(%rax), %rax\n"
);
case!(
    store_through_pointer,
    prog(vec![int_ptr("p")], vec![Stmt::expr(set_deref("p", num(9)))]),
    "    movq $9, %rax\n    pushq %rax\n    movq -8(%rbx), %rsi\n    popq %rax\n    movq %rax, 0(%rsi)\n"
);

/// `int f(int a, int b) { return b; }` and a `main` running `stmts`.
fn with_f(stmts: Vec<Stmt>) -> Ast {
    let mut ast = Ast::new();
    let body = block(&mut ast, vec![], vec![Stmt::ret(Some(var("b").into()))]);
    ast.function(
        1,
        Base::Int,
        "f",
        vec![Decl::param(1, Base::Int, "a"), Decl::param(1, Base::Int, "b")],
        body,
    );
    main_with(&mut ast, vec![], stmts);
    ast
}

case!(
    call_pushes_arguments_in_reverse,
    with_f(vec![Stmt::expr(call("f", vec![num(1).into(), num(2).into()]))]),
    "    movq $2, %rax\n    pushq %rax\n    movq $1, %rax\n    pushq %rax\n    pushq %rbx\n    call f\n    popq %rbx\n    addq $16, %rsp\n"
);
case!(
    return_leaves_function,
    with_f(vec![]),
    "f:\n    movq %rsp, %rbx\n    movq 24(%rbx), %rax\n    movq %rbx, %rsp\n    ret\n"
);
case!(
    array_param_is_a_pointer,
    {
        let mut ast = Ast::new();
        let body = block(&mut ast, vec![], vec![Stmt::write(index("v", num(0)))]);
        ast.function(1, Base::Void, "f", vec![Decl::array_param(1, Base::Int, "v")], body);
        main_with(&mut ast, vec![], vec![]);
        ast
    },
    "    movq 16(%rbx), %rax\n    pushq %rax\n    movq $0, %rax\n"
);

#[test]
fn data_section_header() {
    let asm = asm(prog(vec![], vec![]));
    assert!(asm.starts_with(concat!(
        ".section .rodata\n",
        ".WriteIntString: .string \"%d \"\n",
        ".WritelnString: .string \"\\n\"\n",
        ".WriteStringString: .string \"%s \"\n",
        ".ReadIntString: .string \"%d\"\n",
    )));
    assert!(asm.contains(".text\n.global main\n"));
    assert!(asm.ends_with(".section .note.GNU-stack,\"\",@progbits\n"));
}

#[test]
fn strings_are_pooled() {
    let asm = asm(prog(
        vec![],
        vec![
            Stmt::write(string("hi")),
            Stmt::write(string("yo")),
            Stmt::write(string("hi")),
        ],
    ));
    assert!(asm.contains(".S0: .string \"hi\"\n.S1: .string \"yo\"\n"));
    assert_eq!(asm.matches(".string \"hi\"").count(), 1);
    assert_eq!(asm.matches("leaq .S0(%rip), %rax").count(), 2);
}

#[test]
fn labels_continue_across_functions() {
    let mut ast = Ast::new();
    let body = block(&mut ast, vec![], vec![Stmt::while_(num(1), Stmt::empty())]);
    ast.function(1, Base::Void, "spin", vec![], body);
    main_with(&mut ast, vec![], vec![Stmt::while_(num(1), Stmt::empty())]);
    let asm = asm(ast);
    assert!(asm.contains("spin:\n    movq %rsp, %rbx\n.L0:\n"));
    assert!(asm.contains("main:\n    movq %rsp, %rbx\n.L2:\n"));
}

#[test]
fn missing_main_writes_only_data() {
    let mut ast = Ast::new();
    ast.global(Decl::var(1, Base::Int, "g"));
    let body = block(&mut ast, vec![], vec![Stmt::write(string("x"))]);
    ast.function(1, Base::Void, "f", vec![], body);

    let err = compile(&mut ast.clone(), &Config::default()).unwrap_err();
    assert!(matches!(err, Error::NoMain));

    bplc::resolve(&mut ast, &Config::default()).unwrap();
    layout(&mut ast);
    let mut out = Vec::new();
    let err = generate(&ast, &mut Labels::new(), &mut out).unwrap_err();
    assert!(matches!(err, Error::NoMain));
    let out = String::from_utf8(out).unwrap();
    assert!(out.contains(".comm g, 8, 32\n"));
    assert!(out.contains(".S0: .string \"x\"\n"));
    assert!(!out.contains(".text"));
}

#[test]
fn unresolved_tree_is_rejected() {
    let mut ast = prog(vec![int("x")], vec![Stmt::write(var("x"))]);
    layout(&mut ast);
    let err = generate(&ast, &mut Labels::new(), &mut Vec::<u8>::new()).unwrap_err();
    assert!(matches!(err, Error::Unresolved(_)));
}
