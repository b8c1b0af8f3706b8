//! FFI bindings for Cogload
//!
//! This module provides C-compatible functions for calling Cogload from other languages.
//! All functions use C strings (null-terminated) and return allocated memory that
//! must be freed by the caller using `cogload_free_string`.

use std::cell::RefCell;
use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::ptr;

use crate::config::EngineConfig;
use crate::error::ComputeError;
use crate::pipeline::{analyze_json, simulate_json, CognitiveEngine};

// Thread-local storage for the last error message
thread_local! {
    static LAST_ERROR: RefCell<Option<CString>> = const { RefCell::new(None) };
}

fn set_last_error(msg: &str) {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = CString::new(msg).ok();
    });
}

fn clear_last_error() {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = None;
    });
}

/// Borrow a C string as UTF-8, recording `what` as the error on failure
unsafe fn read_arg(ptr: *const c_char, what: &str) -> Option<String> {
    if ptr.is_null() {
        set_last_error(&format!("Invalid {} string pointer", what));
        return None;
    }
    match CStr::from_ptr(ptr).to_str() {
        Ok(s) => Some(s.to_string()),
        Err(_) => {
            set_last_error(&format!("{} is not valid UTF-8", what));
            None
        }
    }
}

/// Hand a result to the caller as an owned C string, or NULL with the error recorded
fn into_c_result(result: Result<String, ComputeError>) -> *mut c_char {
    match result {
        Ok(json) => match CString::new(json) {
            Ok(cstr) => cstr.into_raw(),
            Err(e) => {
                set_last_error(&e.to_string());
                ptr::null_mut()
            }
        },
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

// ============================================================================
// Stateless API
// ============================================================================

/// Analyze a JSON array of check-ins and return the engine report as JSON.
///
/// # Safety
/// - `check_ins_json` must be a valid null-terminated C string.
/// - Returns a newly allocated string that must be freed with `cogload_free_string`.
/// - Returns NULL on error; call `cogload_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn cogload_analyze(check_ins_json: *const c_char) -> *mut c_char {
    clear_last_error();

    let Some(json) = read_arg(check_ins_json, "check-ins JSON") else {
        return ptr::null_mut();
    };
    into_c_result(analyze_json(json))
}

/// Project the upcoming week and return the simulation result as JSON.
///
/// # Safety
/// - `check_ins_json` and `input_json` must be valid null-terminated C strings.
/// - Returns a newly allocated string that must be freed with `cogload_free_string`.
/// - Returns NULL on error; call `cogload_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn cogload_simulate(
    check_ins_json: *const c_char,
    input_json: *const c_char,
) -> *mut c_char {
    clear_last_error();

    let Some(check_ins) = read_arg(check_ins_json, "check-ins JSON") else {
        return ptr::null_mut();
    };
    let Some(input) = read_arg(input_json, "simulation input JSON") else {
        return ptr::null_mut();
    };
    into_c_result(simulate_json(&check_ins, &input))
}

// ============================================================================
// Configured Engine API
// ============================================================================

/// Opaque handle to a configured CognitiveEngine
pub struct CogloadEngineHandle {
    engine: CognitiveEngine,
}

/// Create an engine from a TOML configuration document.
///
/// # Safety
/// - `config_toml` must be a valid null-terminated C string, or NULL for defaults.
/// - Must be freed with `cogload_engine_free`.
/// - Returns NULL on error; call `cogload_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn cogload_engine_new(config_toml: *const c_char) -> *mut CogloadEngineHandle {
    clear_last_error();

    let config = if config_toml.is_null() {
        EngineConfig::default()
    } else {
        let Some(toml) = read_arg(config_toml, "config TOML") else {
            return ptr::null_mut();
        };
        match EngineConfig::from_toml_str(&toml) {
            Ok(config) => config,
            Err(e) => {
                set_last_error(&e.to_string());
                return ptr::null_mut();
            }
        }
    };

    Box::into_raw(Box::new(CogloadEngineHandle {
        engine: CognitiveEngine::new(config),
    }))
}

/// Free an engine.
///
/// # Safety
/// - `engine` must be a valid pointer returned by `cogload_engine_new`, or NULL.
/// - After calling this function, the pointer is invalid.
#[no_mangle]
pub unsafe extern "C" fn cogload_engine_free(engine: *mut CogloadEngineHandle) {
    if !engine.is_null() {
        drop(Box::from_raw(engine));
    }
}

/// Analyze check-ins with a configured engine.
///
/// # Safety
/// - `engine` must be a valid pointer returned by `cogload_engine_new`.
/// - `check_ins_json` must be a valid null-terminated C string.
/// - Returns a newly allocated string that must be freed with `cogload_free_string`.
/// - Returns NULL on error; call `cogload_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn cogload_engine_analyze(
    engine: *const CogloadEngineHandle,
    check_ins_json: *const c_char,
) -> *mut c_char {
    clear_last_error();

    if engine.is_null() {
        set_last_error("Null engine pointer");
        return ptr::null_mut();
    }
    let handle = &*engine;

    let Some(json) = read_arg(check_ins_json, "check-ins JSON") else {
        return ptr::null_mut();
    };
    into_c_result(handle.engine.analyze_json(&json))
}

// ============================================================================
// Memory Management
// ============================================================================

/// Free a string returned by Cogload functions.
///
/// # Safety
/// - `ptr` must be a valid pointer returned by a Cogload function, or NULL.
/// - After calling this function, the pointer is invalid.
#[no_mangle]
pub unsafe extern "C" fn cogload_free_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        drop(CString::from_raw(ptr));
    }
}

// ============================================================================
// Error Handling
// ============================================================================

/// Get the last error message.
///
/// # Safety
/// - Returns a pointer to a thread-local error string.
/// - The returned pointer is valid until the next Cogload function call on this thread.
/// - Do NOT free the returned pointer.
/// - Returns NULL if no error occurred.
#[no_mangle]
pub unsafe extern "C" fn cogload_last_error() -> *const c_char {
    LAST_ERROR.with(|e| match &*e.borrow() {
        Some(cstr) => cstr.as_ptr(),
        None => ptr::null(),
    })
}

/// Get the Cogload library version.
///
/// # Safety
/// - Returns a pointer to a static string. Do NOT free.
#[no_mangle]
pub unsafe extern "C" fn cogload_version() -> *const c_char {
    static VERSION: &[u8] = concat!(env!("CARGO_PKG_VERSION"), "\0").as_bytes();
    VERSION.as_ptr() as *const c_char
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_check_ins() -> CString {
        CString::new(
            r#"[
                {"id":"a","date":"2024-01-01","focusHours":6,"sleepHours":7,"deadlinePressure":50,"taskSwitching":40,"mentalClarity":3},
                {"id":"b","date":"2024-01-02","focusHours":8,"sleepHours":6,"deadlinePressure":70,"taskSwitching":60,"mentalClarity":2,"moodWord":"tired"}
            ]"#,
        )
        .unwrap()
    }

    #[test]
    fn test_ffi_analyze() {
        let json = sample_check_ins();
        unsafe {
            let result = cogload_analyze(json.as_ptr());
            assert!(!result.is_null());
            assert!(cogload_last_error().is_null());

            let report: serde_json::Value =
                serde_json::from_str(CStr::from_ptr(result).to_str().unwrap()).unwrap();
            assert_eq!(report["check_in_count"], 2);

            cogload_free_string(result);
        }
    }

    #[test]
    fn test_ffi_simulate() {
        let json = CString::new("[]").unwrap();
        let input = CString::new(
            r#"{"expectedWorkload":80,"majorDeadlines":3,"plannedSleep":6,"recoveryIntention":20}"#,
        )
        .unwrap();
        unsafe {
            let result = cogload_simulate(json.as_ptr(), input.as_ptr());
            assert!(!result.is_null());

            let value: serde_json::Value =
                serde_json::from_str(CStr::from_ptr(result).to_str().unwrap()).unwrap();
            assert_eq!(value["projected_loads"].as_array().unwrap().len(), 7);

            cogload_free_string(result);
        }
    }

    #[test]
    fn test_ffi_engine_lifecycle() {
        let config = CString::new("[simulation]\ndaily_drift = 0.0").unwrap();
        let json = sample_check_ins();
        unsafe {
            let engine = cogload_engine_new(config.as_ptr());
            assert!(!engine.is_null());

            let result = cogload_engine_analyze(engine, json.as_ptr());
            assert!(!result.is_null());
            cogload_free_string(result);
            cogload_engine_free(engine);

            let defaults = cogload_engine_new(ptr::null());
            assert!(!defaults.is_null());
            cogload_engine_free(defaults);
        }
    }

    #[test]
    fn test_ffi_error_handling() {
        let invalid = CString::new("not json").unwrap();
        unsafe {
            assert!(cogload_analyze(invalid.as_ptr()).is_null());
            let error = cogload_last_error();
            assert!(!error.is_null());
            assert!(!CStr::from_ptr(error).to_str().unwrap().is_empty());

            assert!(cogload_analyze(ptr::null()).is_null());
            assert_eq!(
                CStr::from_ptr(cogload_last_error()).to_str().unwrap(),
                "Invalid check-ins JSON string pointer"
            );

            let bad_config = CString::new("[simulation\n").unwrap();
            assert!(cogload_engine_new(bad_config.as_ptr()).is_null());
            assert!(cogload_engine_analyze(ptr::null(), invalid.as_ptr()).is_null());
        }
    }

    #[test]
    fn test_ffi_version() {
        unsafe {
            let version = cogload_version();
            let version_str = CStr::from_ptr(version).to_str().unwrap();
            assert_eq!(version_str, crate::COGLOAD_VERSION);
        }
    }
}
