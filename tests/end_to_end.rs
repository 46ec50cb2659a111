use scc::error::SourceError;
use scc::{compile, compile_to_string};

fn asm(source: &str) -> String {
    compile_to_string(source).unwrap()
}

/// Instructions between `name:` and the function's `ret`.
fn function_body<'a>(asm: &'a str, name: &str) -> &'a str {
    let start = asm.find(&format!("\n{name}:\n")).unwrap();
    let rest = &asm[start..];
    let end = rest.find("\tret\n").unwrap();
    &rest[..end]
}

#[test]
fn test_print_variable() {
    let out = asm("int x; void main() { x = 5; print x; }");
    assert!(out.contains("\t.comm\tx,4,4\n"));
    let main = function_body(&out, "main");
    assert!(main.contains("\tmovq\t$5, %r8\n\tmovl\t%r8d, x(%rip)\n"));
    assert!(main.contains("\tmovl\tx(%rip), %r8d\n\tmovq\t%r8, %rdi\n\tcall\tprintint\n"));
}

#[test]
fn test_char_widened_into_int() {
    let out = asm("char c; int i; void main() { c = 3; i = c + 2; print i; }");
    let main = function_body(&out, "main");
    assert!(main.contains("\tmovb\t%r8b, c(%rip)\n"));
    assert!(main.contains(
        "\tmovzbq\tc(%rip), %r8\n\tmovq\t$2, %r9\n\taddq\t%r8, %r9\n\tmovl\t%r9d, i(%rip)\n"
    ));
}

#[test]
fn test_if_else_branches() {
    let out = asm(
        "int a;
        void main() {
            a = 10;
            if (a == 10) { print 1; } else { print 2; }
        }",
    );
    let main = function_body(&out, "main");
    assert!(main.contains("\tcmpq\t%r9, %r8\n\tjne\t.L2\n"));
    assert!(main.contains("\tjmp\t.L3\n.L2:\n"));
    assert!(main.ends_with(".L3:\n\tmovl\t$0, %eax\n.L1:\n\tpopq\t%rbp\n"));
}

#[test]
fn test_for_loop() {
    let out = asm(
        "int i;
        void main() {
            for (i = 0; i < 3; i = i + 1) { print i; }
        }",
    );
    let main = function_body(&out, "main");
    let expected = "\tmovq\t$0, %r8
\tmovl\t%r8d, i(%rip)
.L2:
\tmovl\ti(%rip), %r8d
\tmovq\t$3, %r9
\tcmpq\t%r9, %r8
\tjge\t.L3
\tmovl\ti(%rip), %r8d
\tmovq\t%r8, %rdi
\tcall\tprintint
\tmovl\ti(%rip), %r8d
\tmovq\t$1, %r9
\taddq\t%r8, %r9
\tmovl\t%r9d, i(%rip)
\tjmp\t.L2
.L3:
";
    assert!(main.contains(expected));
}

#[test]
fn test_function_call_in_expression() {
    let out = asm(
        "int f() { return 42; }
        void main() { print f() + 1; }",
    );
    let f = function_body(&out, "f");
    assert!(f.contains("\tmovq\t$42, %r8\n\tmovl\t%r8d, %eax\n\tjmp\t.L1\n.L1:\n"));
    let main = function_body(&out, "main");
    assert!(main.contains("\tcall\tf\n\tmovq\t%rax, %r8\n\tmovq\t$1, %r9\n\taddq\t%r8, %r9\n"));
    assert!(out.contains("\t.globl\tmain\n\t.type\tmain, @function\n"));
}

#[test]
fn test_redeclaration_is_fatal() {
    let mut sink = Vec::<u8>::new();
    let err = compile("int x; int x;", &mut sink).unwrap_err();
    assert!(err.is_source());
    assert_eq!(err.source_kind(), Some(&SourceError::Redeclaration("x".into())));
    assert_eq!(err.to_string(), "redeclaration of x on line 1");
}

#[test]
fn test_lexer_errors_carry_line() {
    let err = compile_to_string("int x;\nvoid main() {\n  x = 1 @ 2;\n}").unwrap_err();
    assert_eq!(err.source_kind(), Some(&SourceError::UnrecognisedChar('@')));
    assert_eq!(err.line(), Some(3));
}

#[test]
fn test_output_frame() {
    let out = asm("void main() { }");
    assert!(out.starts_with("\t.text\n.LC0:\n"));
    assert!(out.contains("printint:\n"));
    assert!(out.ends_with("\t.section\t.note.GNU-stack,\"\",@progbits\n"));
}

#[test]
fn test_recursive_call_resolves() {
    let out = asm(
        "long n;
        long down() {
            if (n > 0) { n = n - 1; n = down(); }
            return n;
        }",
    );
    assert!(function_body(&out, "down").contains("\tcall\tdown\n"));
}

#[test]
fn test_pointers_end_to_end() {
    let out = asm(
        "char c; char *p; long l;
        void main() { c = 65; p = &c; l = *p; print l; }",
    );
    let main = function_body(&out, "main");
    assert!(main.contains("\tleaq\tc(%rip), %r8\n\tmovq\t%r8, p(%rip)\n"));
    assert!(main.contains("\tmovq\tp(%rip), %r8\n\tmovzbq\t(%r8), %r8\n\tmovq\t%r8, l(%rip)\n"));
}

#[test]
fn test_local_declarations_are_global_storage() {
    let out = asm("void main() { int x; x = 2; print x; }");
    assert!(out.contains("\t.comm\tx,4,4\n"));
}

#[test]
fn test_live_operand_saved_across_call() {
    let out = asm(
        "int f() { return 42; }
        void main() { print 1 + f(); }",
    );
    let main = function_body(&out, "main");
    assert!(main.contains("\tpushq\t%r8\n\tsubq\t$8, %rsp\n\tcall\tf\n\taddq\t$8, %rsp\n\tpopq\t%r8\n"));
    assert!(main.contains("\tmovq\t%rax, %r9\n\taddq\t%r8, %r9\n"));
}
