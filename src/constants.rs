/// 推荐接口默认返回条数
pub const DEFAULT_RECOMMENDATION_LIMIT: usize = 3;

/// 推荐接口允许的最大返回条数
pub const MAX_RECOMMENDATION_LIMIT: usize = 20;

/// 知识库无任何匹配时，兜底训练的最低得分
pub const FALLBACK_MIN_SCORE: f64 = 10.0;

/// 关节角合法范围上限（度）
pub const MAX_JOINT_ANGLE_DEG: i32 = 180;

/// 请求体大小上限
pub const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// 单次反馈请求最多携带的问题短语数
pub const MAX_DETECTED_ISSUES: usize = 32;

/// LLM 反馈补充文本最大长度（字符）
pub const MAX_ELABORATION_CHARS: usize = 2_000;
