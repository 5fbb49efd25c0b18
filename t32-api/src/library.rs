//! t32api 共有ライブラリの検索と読み込み

use crate::api::{T32Api, MESSAGE_BUFFER_LEN};
use libloading::Library;
use std::ffi::CStr;
use std::os::raw::{c_char, c_int};
use std::path::{Path, PathBuf};
use t32_core::{Result, T32Error};

/// T32SYS からの相対パスの候補
const LIBRARY_SUBDIRS: [&str; 2] = ["demo/api/capi/dll", "demo/api/python"];

type ConfigFn = unsafe extern "C" fn(*const c_char, *const c_char) -> c_int;
type NoArgFn = unsafe extern "C" fn() -> c_int;
type AttachFn = unsafe extern "C" fn(c_int) -> c_int;
type CmdFn = unsafe extern "C" fn(*const c_char) -> c_int;
type PracticeStateFn = unsafe extern "C" fn(*mut c_int) -> c_int;
type GetMessageFn = unsafe extern "C" fn(*mut c_char, *mut u16) -> c_int;
type EvalGetStringFn = unsafe extern "C" fn(*mut c_char) -> c_int;

/// 実行中のプラットフォームに合ったライブラリ名
pub fn library_name() -> &'static str {
    if cfg!(windows) {
        if cfg!(target_pointer_width = "32") {
            "t32api.dll"
        } else {
            "t32api64.dll"
        }
    } else if cfg!(target_os = "macos") {
        "t32api.dylib"
    } else if cfg!(target_pointer_width = "32") {
        "t32api.so"
    } else {
        "t32api64.so"
    }
}

/// インストールルート配下からライブラリを探す
pub fn find_library_in(t32sys: &Path) -> Result<PathBuf> {
    let name = library_name();
    let candidates: Vec<PathBuf> = LIBRARY_SUBDIRS
        .iter()
        .map(|subdir| t32sys.join(subdir).join(name))
        .collect();

    match candidates.iter().find(|path| path.exists()) {
        Some(path) => Ok(path.clone()),
        None => Err(T32Error::LibraryNotFound { searched: candidates }),
    }
}

/// 環境変数 T32SYS を基にライブラリを探す
pub fn find_library() -> Result<PathBuf> {
    find_library_in(&t32_core::t32sys()?)
}

/// 読み込み済みの t32api ライブラリ
pub struct T32Library {
    config: ConfigFn,
    init: NoArgFn,
    exit: NoArgFn,
    attach: AttachFn,
    cmd: CmdFn,
    get_practice_state: PracticeStateFn,
    get_message: GetMessageFn,
    eval_get_string: EvalGetStringFn,
    path: PathBuf,
    // 関数ポインタより長く生存させる
    _library: Library,
}

impl T32Library {
    /// 指定パスのライブラリを読み込む
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(T32Error::LibraryNotFound {
                searched: vec![path.to_path_buf()],
            });
        }
        tracing::debug!("Loading t32api from {:?}", path);

        let library = unsafe { Library::new(path) }.map_err(|e| T32Error::LibraryLoad {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        // SAFETY: シグネチャは t32api のヘッダ (t32.h) に合わせている
        unsafe {
            Ok(Self {
                config: symbol(&library, path, b"T32_Config\0")?,
                init: symbol(&library, path, b"T32_Init\0")?,
                exit: symbol(&library, path, b"T32_Exit\0")?,
                attach: symbol(&library, path, b"T32_Attach\0")?,
                cmd: symbol(&library, path, b"T32_Cmd\0")?,
                get_practice_state: symbol(&library, path, b"T32_GetPracticeState\0")?,
                get_message: symbol(&library, path, b"T32_GetMessage\0")?,
                eval_get_string: symbol(&library, path, b"T32_EvalGetString\0")?,
                path: path.to_path_buf(),
                _library: library,
            })
        }
    }

    /// T32SYS 配下からライブラリを探して読み込む
    pub fn discover() -> Result<Self> {
        Self::load(find_library()?)
    }

    /// 読み込んだライブラリのパス
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// シンボルを関数ポインタとして取り出す
unsafe fn symbol<T: Copy>(library: &Library, path: &Path, name: &[u8]) -> Result<T> {
    library.get::<T>(name).map(|sym| *sym).map_err(|e| T32Error::LibraryLoad {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

impl T32Api for T32Library {
    fn config(&self, key: &CStr, value: &CStr) -> i32 {
        unsafe { (self.config)(key.as_ptr(), value.as_ptr()) }
    }

    fn init(&self) -> i32 {
        unsafe { (self.init)() }
    }

    fn exit(&self) -> i32 {
        unsafe { (self.exit)() }
    }

    fn attach(&self, device: i32) -> i32 {
        unsafe { (self.attach)(device) }
    }

    fn cmd(&self, command: &CStr) -> i32 {
        unsafe { (self.cmd)(command.as_ptr()) }
    }

    fn get_practice_state(&self, state: &mut i32) -> i32 {
        unsafe { (self.get_practice_state)(state) }
    }

    fn get_message(&self, buffer: &mut [u8; MESSAGE_BUFFER_LEN], mode: &mut u16) -> i32 {
        unsafe { (self.get_message)(buffer.as_mut_ptr().cast(), mode) }
    }

    fn eval_get_string(&self, buffer: &mut [u8; MESSAGE_BUFFER_LEN]) -> i32 {
        unsafe { (self.eval_get_string)(buffer.as_mut_ptr().cast()) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_name_matches_platform() {
        let name = library_name();
        assert!(name.starts_with("t32api"));
        #[cfg(all(target_os = "linux", target_pointer_width = "64"))]
        assert_eq!(name, "t32api64.so");
    }

    #[test]
    fn test_find_library_in_missing() {
        let dir = tempfile::tempdir().unwrap();
        let err = find_library_in(dir.path()).unwrap_err();
        assert!(err.is_not_found());
        match err {
            T32Error::LibraryNotFound { searched } => {
                assert_eq!(searched.len(), 2);
                assert!(searched[0].starts_with(dir.path().join("demo/api/capi/dll")));
                assert!(searched[1].starts_with(dir.path().join("demo/api/python")));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_find_library_in_prefers_capi_dir() {
        let dir = tempfile::tempdir().unwrap();
        for subdir in LIBRARY_SUBDIRS {
            let libdir = dir.path().join(subdir);
            std::fs::create_dir_all(&libdir).unwrap();
            std::fs::write(libdir.join(library_name()), b"").unwrap();
        }
        let found = find_library_in(dir.path()).unwrap();
        assert_eq!(found, dir.path().join("demo/api/capi/dll").join(library_name()));
    }

    #[test]
    fn test_find_library_in_python_dir() {
        let dir = tempfile::tempdir().unwrap();
        let libdir = dir.path().join("demo/api/python");
        std::fs::create_dir_all(&libdir).unwrap();
        std::fs::write(libdir.join(library_name()), b"").unwrap();

        assert_eq!(find_library_in(dir.path()).unwrap(), libdir.join(library_name()));
    }

    #[test]
    fn test_load_missing_library_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(library_name());

        match T32Library::load(&path) {
            Err(err @ T32Error::LibraryNotFound { .. }) => {
                assert!(err.is_not_found());
                if let T32Error::LibraryNotFound { searched } = err {
                    assert_eq!(searched, vec![path]);
                }
            }
            Err(other) => panic!("unexpected error: {:?}", other),
            Ok(_) => panic!("loading a missing library should fail"),
        }
    }

    #[test]
    fn test_load_invalid_library() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(library_name());
        std::fs::write(&path, b"not a shared library").unwrap();

        match T32Library::load(&path) {
            Err(T32Error::LibraryLoad { path: p, .. }) => assert_eq!(p, path),
            Err(other) => panic!("unexpected error: {:?}", other),
            Ok(_) => panic!("loading garbage should fail"),
        }
    }
}
