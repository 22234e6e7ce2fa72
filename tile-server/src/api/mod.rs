//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`session`] - 模拟登录
//! - [`orders`] - 顾客订单 (含变更事件流)
//! - [`editor`] - 瓷砖编辑器
//! - [`checkout`] - 结账
//! - [`admin`] - 管理后台

pub mod admin;
pub mod checkout;
pub mod editor;
pub mod health;
pub mod orders;
pub mod session;
