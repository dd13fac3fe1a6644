/*
 * Responsibility
 * - handler 向け extractor の公開口
 */
pub mod principal;

pub use principal::{Principal, PrincipalExtractor};
