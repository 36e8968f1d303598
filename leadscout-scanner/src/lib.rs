pub mod auditor;
pub mod error;
pub mod result;

pub use auditor::{Auditor, normalize_domain};
pub use error::ScanError;
pub use result::SiteAudit;
