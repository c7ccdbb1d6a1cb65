mod common;
mod domain;
mod overrides;
