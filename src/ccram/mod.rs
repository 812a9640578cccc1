mod run;

pub use run::{run, CcramArgs};
