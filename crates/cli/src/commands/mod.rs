pub mod classifiers;
pub mod decode;
pub mod extract;
pub mod history;
pub mod scan;
pub mod util;

pub use classifiers::*;
pub use decode::*;
pub use extract::*;
pub use history::*;
pub use scan::*;
pub use util::*;
