use serde::{Deserialize, Serialize};

/// 统一的接口响应结构
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub code: i32,
    pub msg: String,
    pub resp_data: Option<T>,
}
