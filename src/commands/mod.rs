pub type CmdResult<T> = obdispatch::Result<(T, i32)>;

pub mod dispatch;
