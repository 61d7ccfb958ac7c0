//! Result rendering: minimal JSON and directive templates.

pub mod json;
pub mod template;

pub use json::{render_record, render_results, render_results_to_vec};
pub use template::{render_result_fragments, render_template, Template, TemplateNode};
