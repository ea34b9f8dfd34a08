pub(crate) mod check;
pub(crate) mod encode;
pub(crate) mod explain;
pub(crate) mod helpers;
pub(crate) mod parse;
