pub(crate) mod analysis;
pub(crate) mod caption;
pub(crate) mod edit;
pub(crate) mod model;
pub(crate) mod wire;

#[cfg(test)]
#[path = "../../tests/unit/ai/fake.rs"]
pub(crate) mod fake;
