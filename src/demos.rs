//! Small programs written directly against [`Backend`], the same calls a
//! front end would make while walking its parse tree.

use crate::lang::{
    ir::{evaluate_binary, Expr},
    Backend,
};

/// Top-level assignment, printing, and arithmetic including the IEEE-754
/// corner cases of division.
pub fn arithmetic<B: Backend>(backend: &mut B) {
    backend.assign("x", 5.0);
    backend.print_number("x");

    backend.assign("y", Expr::binary("x", b'*', Expr::binary(2.0, b'+', 1.0)));
    backend.print_text("x * (2 + 1) =");
    backend.print_number("y");

    backend.print_text("1 / 0 and 0 / 0:");
    backend.print_number(evaluate_binary(1.0, 0.0, b'/'));
    backend.print_number(evaluate_binary(0.0, 0.0, b'/'));

    // Never assigned, so it reads as zero
    backend.print_number("unassigned");
}

/// Definitions, calls for a value and calls for effect.
pub fn functions<B: Backend>(backend: &mut B) {
    if backend.begin_definition("fifteen", true).is_ok() {
        backend.return_value(Expr::binary(3.0, b'+', Expr::binary(3.0, b'*', 4.0)));
        backend.end_definition();
    }

    if backend.begin_definition("greet", false).is_ok() {
        backend.print_text("hello from greet");
        backend.end_definition();
    }

    backend.call("greet");
    backend.print_number(Expr::call("fifteen"));
    backend.print_number(Expr::binary(Expr::call("fifteen"), b'/', 3.0));
}

/// A call to a function that does not exist. The interpreter reports it and
/// carries on; the generator reports it and its artifact will not link.
pub fn undefined_call<B: Backend>(backend: &mut B) {
    backend.print_text("calling a function that was never defined:");
    backend.call("missing");
}

/// A local that shadows a global without touching it.
pub fn scoping<B: Backend>(backend: &mut B) {
    backend.assign("level", 1.0);

    if backend.begin_definition("shadow", false).is_ok() {
        backend.assign("level", 2.0);
        backend.print_text("inside shadow:");
        backend.print_number("level");
        backend.end_definition();
    }

    backend.call("shadow");
    backend.print_text("back at top level:");
    backend.print_number("level");
}
