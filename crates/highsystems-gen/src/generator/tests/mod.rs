mod overrides;
mod support;
