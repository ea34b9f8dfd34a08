use crate::terms::SmtTerm;

/// Quote a symbol as `|...|`.
///
/// Timed atom names contain `@`, which SMT-LIB reserves at the start of a
/// symbol; quoting every variable keeps the output valid for any name.
pub fn quote_symbol(name: &str) -> String {
    format!("|{name}|")
}

/// Print an SmtTerm as SMT-LIB2 format.
pub fn to_smtlib(term: &SmtTerm) -> String {
    match term {
        SmtTerm::Var(name) => quote_symbol(name),
        SmtTerm::BoolLit(b) => {
            if *b {
                "true".to_string()
            } else {
                "false".to_string()
            }
        }
        SmtTerm::And(terms) => {
            if terms.is_empty() {
                "true".to_string()
            } else if terms.len() == 1 {
                to_smtlib(&terms[0])
            } else {
                let inner: Vec<String> = terms.iter().map(to_smtlib).collect();
                format!("(and {})", inner.join(" "))
            }
        }
        SmtTerm::Or(terms) => {
            if terms.is_empty() {
                "false".to_string()
            } else if terms.len() == 1 {
                to_smtlib(&terms[0])
            } else {
                let inner: Vec<String> = terms.iter().map(to_smtlib).collect();
                format!("(or {})", inner.join(" "))
            }
        }
        SmtTerm::Not(inner) => format!("(not {})", to_smtlib(inner)),
    }
}

/// Print a complete `QF_UF` script: declarations, assertions, `(check-sat)`.
pub fn to_smtlib_script<'a>(
    declarations: impl IntoIterator<Item = &'a str>,
    assertions: &[SmtTerm],
) -> String {
    let mut out = String::from("(set-logic QF_UF)\n");
    for name in declarations {
        out.push_str(&format!("(declare-const {} Bool)\n", quote_symbol(name)));
    }
    for term in assertions {
        out.push_str(&format!("(assert {})\n", to_smtlib(term)));
    }
    out.push_str("(check-sat)\n");
    out
}
