pub(crate) mod van;
