pub mod smtlib_printer;
pub mod smtlib_process;
pub mod varisat_backend;
#[cfg(feature = "z3")]
pub mod z3_backend;
