//! Index page rendering

use minijinja::{context, Environment};
use pingsweep_common::{PingsweepError, PingsweepResult};

const INDEX_NAME: &str = "index.html";
const INDEX_TEMPLATE: &str = include_str!("../templates/index.html");

/// The single-page UI, compiled once at startup.
pub struct IndexPage {
    env: Environment<'static>,
}

impl IndexPage {
    /// Load the embedded template.
    pub fn new() -> PingsweepResult<Self> {
        Self::from_source(INDEX_TEMPLATE)
    }

    /// Load a page from arbitrary template source. HTML auto-escaping applies.
    pub fn from_source(source: &'static str) -> PingsweepResult<Self> {
        let mut env = Environment::new();
        env.add_template(INDEX_NAME, source)
            .map_err(|e| PingsweepError::Template(e.to_string()))?;
        Ok(Self { env })
    }

    pub fn render(&self, default_subnet: &str, has_icon: bool) -> PingsweepResult<String> {
        self.env
            .get_template(INDEX_NAME)
            .and_then(|t| {
                t.render(context! {
                    default_subnet => default_subnet,
                    has_icon => has_icon,
                })
            })
            .map_err(|e| PingsweepError::Template(e.to_string()))
    }
}
