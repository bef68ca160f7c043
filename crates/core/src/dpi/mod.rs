//! HDL backdoor access for the verification library's DPI layer.
//!
//! The methodology library links against six `uvm_hdl_*` functions to read,
//! deposit, force and release signals by hierarchical path. Cycle-based models
//! have no VPI behind them, so the exported entry points route to
//! [`UnsupportedBackdoor`], which reports failure for everything and lets the
//! library fall back to front-door access. This module provides:
//! 1. **ABI Types:** `VpiVecVal`, the two-word 4-state value the library passes by pointer.
//! 2. **Safe Wrappers:** `HdlPath` and `HdlValue`, which hold the raw pointers without touching them.
//! 3. **Backend Trait:** `HdlBackdoor`, the Rust-side shape of the six operations.
//! 4. **Exports:** The `extern "C"` symbols themselves (see [`hdl`]).

use std::ffi::CStr;
use std::marker::PhantomData;

use libc::{c_char, c_int};

/// The exported `uvm_hdl_*` symbols.
pub mod hdl;

/// One 32-bit slice of a 4-state vector (`s_vpi_vecval`).
///
/// `aval`/`bval` bit pairs encode 0 (0,0), 1 (1,0), Z (0,1) and X (1,1).
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VpiVecVal {
    /// Value bits.
    pub aval: u32,
    /// Unknown/high-impedance bits.
    pub bval: u32,
}

/// Result of a backdoor operation, as the C caller sees it.
#[repr(i32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HdlStatus {
    /// The operation is not supported or failed.
    Unsupported = 0,
    /// The operation succeeded.
    Done = 1,
}

impl HdlStatus {
    /// Returns the integer handed back across the C ABI.
    pub const fn raw(self) -> c_int {
        self as c_int
    }
}

/// A hierarchical signal path received from C.
///
/// Holds the pointer unread; only [`HdlPath::to_cstr`] looks at it.
#[derive(Clone, Copy, Debug)]
pub struct HdlPath<'a> {
    ptr: *const c_char,
    _marker: PhantomData<&'a CStr>,
}

impl<'a> HdlPath<'a> {
    /// Wraps a Rust string.
    pub const fn from_cstr(path: &'a CStr) -> Self {
        Self {
            ptr: path.as_ptr(),
            _marker: PhantomData,
        }
    }

    /// Wraps a raw path pointer.
    ///
    /// # Safety
    ///
    /// `ptr` must be null or point to a NUL-terminated string that stays
    /// valid and unmodified for `'a`.
    pub const unsafe fn from_raw(ptr: *const c_char) -> Self {
        Self {
            ptr,
            _marker: PhantomData,
        }
    }

    /// Returns the path, or `None` for a null pointer.
    pub fn to_cstr(&self) -> Option<&'a CStr> {
        if self.ptr.is_null() {
            None
        } else {
            // SAFETY: non-null and valid for 'a per the constructor contract.
            Some(unsafe { CStr::from_ptr(self.ptr) })
        }
    }
}

/// A value slot received from C.
///
/// Like [`HdlPath`], the pointer is carried but not accessed unless a backend asks.
#[derive(Debug)]
pub struct HdlValue<'a> {
    ptr: *mut VpiVecVal,
    _marker: PhantomData<&'a mut VpiVecVal>,
}

impl<'a> HdlValue<'a> {
    /// Wraps a Rust value slot.
    pub fn from_mut(value: &'a mut VpiVecVal) -> Self {
        Self {
            ptr: value,
            _marker: PhantomData,
        }
    }

    /// Wraps a raw value pointer.
    ///
    /// # Safety
    ///
    /// `ptr` must be null or valid for reads and writes of one `VpiVecVal`
    /// for `'a`, with no other live reference to it.
    pub const unsafe fn from_raw(ptr: *mut VpiVecVal) -> Self {
        Self {
            ptr,
            _marker: PhantomData,
        }
    }

    /// Returns the current slot contents, or `None` for a null pointer.
    pub fn get(&self) -> Option<VpiVecVal> {
        // SAFETY: null or valid for reads per the constructor contract.
        unsafe { self.ptr.as_ref().copied() }
    }

    /// Stores `value` into the slot. Returns `false` for a null pointer.
    pub fn set(&mut self, value: VpiVecVal) -> bool {
        // SAFETY: null or valid for writes per the constructor contract.
        match unsafe { self.ptr.as_mut() } {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }
}

/// Rust-side shape of the six backdoor operations.
pub trait HdlBackdoor {
    /// Checks that `path` names an accessible signal.
    fn check_path(&self, path: HdlPath<'_>) -> HdlStatus;
    /// Reads the signal at `path` into `value`.
    fn read(&self, path: HdlPath<'_>, value: HdlValue<'_>) -> HdlStatus;
    /// Deposits `value` onto the signal at `path` until its next driver update.
    fn deposit(&self, path: HdlPath<'_>, value: HdlValue<'_>) -> HdlStatus;
    /// Forces `value` onto the signal at `path` until released.
    fn force(&self, path: HdlPath<'_>, value: HdlValue<'_>) -> HdlStatus;
    /// Releases a force on `path` and reads the resulting value into `value`.
    fn release_and_read(&self, path: HdlPath<'_>, value: HdlValue<'_>) -> HdlStatus;
    /// Releases a force on `path`.
    fn release(&self, path: HdlPath<'_>) -> HdlStatus;
}

/// Backend for models without signal access: every operation fails.
///
/// Arguments are never inspected, so any pointer, including null, is accepted.
#[derive(Clone, Copy, Debug, Default)]
pub struct UnsupportedBackdoor;

impl HdlBackdoor for UnsupportedBackdoor {
    fn check_path(&self, _path: HdlPath<'_>) -> HdlStatus {
        HdlStatus::Unsupported
    }

    fn read(&self, _path: HdlPath<'_>, _value: HdlValue<'_>) -> HdlStatus {
        HdlStatus::Unsupported
    }

    fn deposit(&self, _path: HdlPath<'_>, _value: HdlValue<'_>) -> HdlStatus {
        HdlStatus::Unsupported
    }

    fn force(&self, _path: HdlPath<'_>, _value: HdlValue<'_>) -> HdlStatus {
        HdlStatus::Unsupported
    }

    fn release_and_read(&self, _path: HdlPath<'_>, _value: HdlValue<'_>) -> HdlStatus {
        HdlStatus::Unsupported
    }

    fn release(&self, _path: HdlPath<'_>) -> HdlStatus {
        HdlStatus::Unsupported
    }
}
