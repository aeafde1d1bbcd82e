//! Integration tests for the dockyard state resolution engine

mod cascade_resolution;
mod pin_toggle;
mod registry_hydration;
mod test_utils;
