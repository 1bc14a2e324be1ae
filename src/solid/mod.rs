//! SOLID principles, each as a violated/followed pair around the invoice example.

pub mod dip;
pub mod isp;
pub mod lsp;
pub mod ocp;
pub mod srp;
