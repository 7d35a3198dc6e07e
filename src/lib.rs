//! Rule-based advisor that scores a landing page's call-to-action for
//! visibility and clickability, combines rule certainties, and explains its
//! reasoning.

pub mod analysis;
pub mod batch;
pub mod config;
pub mod explain;
pub mod facts;
pub mod inference;
pub mod knowledge;
pub mod output;
