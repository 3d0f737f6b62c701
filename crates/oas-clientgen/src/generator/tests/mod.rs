mod orchestrator;
pub(crate) mod support;
