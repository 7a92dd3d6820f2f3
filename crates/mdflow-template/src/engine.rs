//! Builds the shared Liquid parser (spec §4.8): the stdlib tag/filter set
//! plus the `shell_escape`/`q` filters. One parser is built per render; the
//! grammar itself carries no per-document state.

use mdflow_core::MdflowError;

use crate::filters::{QFilterParser, ShellEscapeFilterParser};

pub fn build_parser() -> Result<liquid::Parser, MdflowError> {
    liquid::ParserBuilder::with_stdlib()
        .filter(ShellEscapeFilterParser)
        .filter(QFilterParser)
        .build()
        .map_err(|e| MdflowError::TemplateRenderError(e.to_string()))
}
