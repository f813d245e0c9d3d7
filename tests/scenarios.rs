use irlang::lang::{
    codegen::CodeGenerator,
    error::Error,
    interpreter::Interpreter,
    ir::{evaluate_binary, Expr},
    Backend,
};
use pretty_assertions::assert_eq;
use std::{fs, io::BufWriter};

fn interpreter() -> Interpreter<Vec<u8>> {
    Interpreter::new(Vec::new())
}

fn printed(interp: &Interpreter<Vec<u8>>) -> String {
    String::from_utf8(interp.output().clone()).unwrap()
}

#[test]
fn top_level_assignment_and_print() {
    let mut interp = interpreter();
    interp.assign("x", 5.0);
    interp.print_number(interp.lookup("x"));
    assert_eq!(printed(&interp), "5.000000\n");

    let mut buffer = Vec::new();
    let mut gen = CodeGenerator::new(&mut buffer);
    gen.assign("x", 5.0);
    gen.print_number("x");
    gen.finish().unwrap();

    let text = String::from_utf8(buffer).unwrap();
    let main = &text[text.find("int main() {").unwrap()..];
    let declared = main.find("double x = 5;").unwrap();
    let print_at = main.find("printf(\"%f\\n\", x);").unwrap();
    assert!(declared < print_at);
}

#[test]
fn function_returns_nested_arithmetic() {
    let mut interp = interpreter();
    interp.begin_definition("f", true).unwrap();
    interp.return_value(Expr::binary(3.0, b'+', Expr::binary(3.0, b'*', 4.0)));
    interp.end_definition();

    assert_eq!(interp.invoke("f"), 15.0);
    assert_eq!(interp.call("f"), 15.0);
}

#[test]
fn undefined_call_is_recoverable() {
    let mut interp = interpreter();

    assert_eq!(interp.invoke("g"), 0.0);
    interp.print_text("still running");

    assert_eq!(printed(&interp), "still running\n");
    let diagnostics = interp.finish().unwrap();
    assert_eq!(diagnostics.to_string(), "Error: Function 'g' not defined.\n");
}

#[test]
fn local_write_never_touches_global() {
    let mut interp = interpreter();
    interp.assign("x", 1.0);
    interp.begin_definition("h", false).unwrap();
    interp.assign("x", 2.0);
    interp.print_number("x");
    interp.end_definition();

    interp.invoke("h");

    assert_eq!(interp.lookup("x"), 1.0);
    assert_eq!(printed(&interp), "2.000000\n");
}

#[test]
fn generator_keeps_first_definition_only() {
    let mut buffer = Vec::new();
    let mut gen = CodeGenerator::new(&mut buffer);
    gen.begin_definition("f", true).unwrap();
    gen.return_value(1.0);
    gen.end_definition();
    gen.begin_definition("f", true).unwrap();
    gen.return_value(2.0);
    gen.end_definition();
    gen.finish().unwrap();

    assert_eq!(
        String::from_utf8(buffer).unwrap(),
        "#include <stdio.h>\n\n\
         double f() {\n\
         \x20   return 1.0;\n\
         }\n\n\
         int main() {\n\
         \x20   return 0;\n\
         }\n"
    );
}

#[test]
fn interpreter_redefinition_is_last_wins() {
    let mut interp = interpreter();
    interp.begin_definition("f", true).unwrap();
    interp.return_value(1.0);
    interp.end_definition();
    interp.begin_definition("f", true).unwrap();
    interp.return_value(2.0);
    interp.end_definition();

    assert_eq!(interp.invoke("f"), 2.0);
}

#[test]
fn deferred_statements_run_in_order_once_per_call() {
    let mut interp = interpreter();
    interp.begin_definition("seq", false).unwrap();
    for word in ["a", "b", "c"] {
        interp.print_text(word);
    }
    interp.end_definition();

    interp.invoke("seq");
    assert_eq!(printed(&interp), "a\nb\nc\n");
    interp.invoke("seq");
    assert_eq!(printed(&interp), "a\nb\nc\na\nb\nc\n");
}

#[test]
fn unassigned_names_read_as_zero() {
    let interp = interpreter();
    for name in ["x", "never", "__global_return"] {
        assert_eq!(interp.lookup(name), 0.0);
    }
}

#[test]
fn arithmetic_properties() {
    assert_eq!(evaluate_binary(2.0, 3.0, b'+'), 5.0);
    assert_eq!(evaluate_binary(2.0, 3.0, b'-'), -1.0);
    assert_eq!(evaluate_binary(2.0, 3.0, b'*'), 6.0);
    assert_eq!(evaluate_binary(1.0, 0.0, b'/'), f64::INFINITY);
    assert!(evaluate_binary(0.0, 0.0, b'/').is_nan());
    assert_eq!(evaluate_binary(2.0, 3.0, b'?'), 0.0);
}

#[test]
fn nested_definition_is_rejected_by_both_backends() {
    let mut interp = interpreter();
    interp.begin_definition("outer", false).unwrap();
    let err = interp.begin_definition("inner", false).unwrap_err();
    assert!(matches!(err, Error::NestedDefinition { .. }));

    let mut gen = CodeGenerator::new(Vec::new());
    gen.begin_definition("outer", false).unwrap();
    let err = gen.begin_definition("inner", false).unwrap_err();
    assert!(matches!(err, Error::NestedDefinition { .. }));
}

#[test]
fn two_programs_do_not_share_state() {
    let mut first = interpreter();
    first.assign("x", 1.0);
    first.begin_definition("f", false).unwrap();
    first.end_definition();

    let mut second = interpreter();
    assert_eq!(second.lookup("x"), 0.0);
    assert_eq!(second.invoke("f"), 0.0);
    assert_eq!(second.diagnostics().len(), 1);
}

#[test]
fn artifact_is_written_to_a_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.c");

    let file = fs::File::create(&path).unwrap();
    let mut gen = CodeGenerator::new(BufWriter::new(file));
    gen.begin_definition("twice", true).unwrap();
    gen.return_value(Expr::binary(21.0, b'*', 2.0));
    gen.end_definition();
    gen.print_number(Expr::call("twice"));
    let diagnostics = gen.finish().unwrap();

    assert!(diagnostics.is_empty());
    let text = fs::read_to_string(&path).unwrap();
    assert!(text.starts_with("#include <stdio.h>\n"));
    assert!(text.contains("double twice() {\n    return (21.0 * 2.0);\n}\n"));
    assert!(text.ends_with("    printf(\"%f\\n\", twice());\n    return 0;\n}\n"));
}
