//! 认证模块
//!
//! - [`SessionStore`] - 模拟登录令牌
//! - [`CurrentCustomer`] - 当前顾客 (提取器)
//! - [`require_session`] / [`require_admin`] - 路由中间件

pub mod middleware;
pub mod session;

pub use middleware::{ADMIN_TOKEN_HEADER, require_admin, require_session};
pub use session::{CurrentCustomer, LoginRequest, SessionStore};
