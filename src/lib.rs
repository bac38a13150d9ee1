//! codepad - 多文件 HTML/CSS/JS 代码练习场内核
//!
//! 模块结构：
//! - kernel: 虚拟文件系统、分屏布局、格式化器、分享编码
//! - kernel::services: 端口（trait）与适配器（存储、编辑器、预览）
//! - models: 数据模型（FileRecord, FolderRecord, Id）

pub mod kernel;
pub mod models;
