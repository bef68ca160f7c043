//! Exported `uvm_hdl_*` entry points.
//!
//! These satisfy the library's link-time references. Each one wraps its raw
//! arguments without reading them and forwards to [`UnsupportedBackdoor`], so
//! every call returns `0`.

use libc::{c_char, c_int};

use super::{HdlBackdoor, HdlPath, HdlValue, UnsupportedBackdoor, VpiVecVal};

const BACKEND: UnsupportedBackdoor = UnsupportedBackdoor;

/// Checks whether `path` is accessible. Always `0`.
///
/// # Safety
///
/// `path` must be null or a valid NUL-terminated string for the duration of the call.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn uvm_hdl_check_path(path: *const c_char) -> c_int {
    // SAFETY: forwarded caller contract.
    let path = unsafe { HdlPath::from_raw(path) };
    BACKEND.check_path(path).raw()
}

/// Reads the signal at `path` into `value`. Always `0`; `value` is left untouched.
///
/// # Safety
///
/// `path` as for [`uvm_hdl_check_path`]; `value` must be null or valid for
/// reads and writes of one `VpiVecVal` for the duration of the call.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn uvm_hdl_read(path: *const c_char, value: *mut VpiVecVal) -> c_int {
    // SAFETY: forwarded caller contract.
    let (path, value) = unsafe { (HdlPath::from_raw(path), HdlValue::from_raw(value)) };
    BACKEND.read(path, value).raw()
}

/// Deposits `value` on the signal at `path`. Always `0`.
///
/// # Safety
///
/// Same contract as [`uvm_hdl_read`].
#[unsafe(no_mangle)]
pub unsafe extern "C" fn uvm_hdl_deposit(path: *const c_char, value: *mut VpiVecVal) -> c_int {
    // SAFETY: forwarded caller contract.
    let (path, value) = unsafe { (HdlPath::from_raw(path), HdlValue::from_raw(value)) };
    BACKEND.deposit(path, value).raw()
}

/// Forces `value` on the signal at `path`. Always `0`.
///
/// # Safety
///
/// Same contract as [`uvm_hdl_read`].
#[unsafe(no_mangle)]
pub unsafe extern "C" fn uvm_hdl_force(path: *const c_char, value: *mut VpiVecVal) -> c_int {
    // SAFETY: forwarded caller contract.
    let (path, value) = unsafe { (HdlPath::from_raw(path), HdlValue::from_raw(value)) };
    BACKEND.force(path, value).raw()
}

/// Releases a force on `path` and reads it back into `value`. Always `0`.
///
/// # Safety
///
/// Same contract as [`uvm_hdl_read`].
#[unsafe(no_mangle)]
pub unsafe extern "C" fn uvm_hdl_release_and_read(
    path: *const c_char,
    value: *mut VpiVecVal,
) -> c_int {
    // SAFETY: forwarded caller contract.
    let (path, value) = unsafe { (HdlPath::from_raw(path), HdlValue::from_raw(value)) };
    BACKEND.release_and_read(path, value).raw()
}

/// Releases a force on `path`. Always `0`.
///
/// # Safety
///
/// Same contract as [`uvm_hdl_check_path`].
#[unsafe(no_mangle)]
pub unsafe extern "C" fn uvm_hdl_release(path: *const c_char) -> c_int {
    // SAFETY: forwarded caller contract.
    let path = unsafe { HdlPath::from_raw(path) };
    BACKEND.release(path).raw()
}
