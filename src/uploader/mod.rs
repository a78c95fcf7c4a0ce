// 上传模块
//
// - hasher: 分片与整个文件的 MD5
// - chunk:  分片规则与分片读取
// - engine: 单个文件的串行分片上传

pub mod chunk;
pub mod engine;
pub mod hasher;

pub use chunk::{
    block_count, format_block_id, BlockReader, UploadBlock, BLOCK_ID_WIDTH, DEFAULT_MAX_BLOCK_SIZE,
    MAX_BLOCK_COUNT,
};
pub use engine::{FileUploadProgress, ProgressCallback};
pub use hasher::{calculate_block_md5, calculate_md5, calculate_stream_md5, md5_base64, Md5Digest};
