//! 单元测试模块
//! 覆盖编译器、节点树、事件派发、JSON 解析等功能

pub mod dom_tests;
pub mod event_tests;
