//! Progress display while the session waits on remote calls

pub mod reporter;
