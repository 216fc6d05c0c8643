//! Visible top-level window titles.

#[cfg(target_os = "windows")]
pub use self::win32::WindowLister;

#[cfg(target_os = "linux")]
pub use self::x11::WindowLister;

#[cfg(not(any(target_os = "windows", target_os = "linux")))]
pub use self::unsupported::WindowLister;

/// First title containing `marker`, in enumeration order
pub fn select_target_title(titles: &[String], marker: &str) -> Option<String> {
    titles.iter().find(|t| t.contains(marker)).cloned()
}

#[cfg(target_os = "windows")]
mod win32 {
    use windows::core::BOOL;
    use windows::Win32::Foundation::{HWND, LPARAM};
    use windows::Win32::UI::WindowsAndMessaging::{
        EnumWindows, GetWindowTextLengthW, GetWindowTextW, IsWindowVisible,
    };

    use crate::platform::PlatformError;

    #[derive(Default)]
    pub struct WindowLister;

    impl WindowLister {
        pub fn new() -> Self {
            Self
        }

        pub fn visible_titles(&mut self) -> Result<Vec<String>, PlatformError> {
            let mut titles: Vec<String> = Vec::new();

            // SAFETY: the callback only runs during this call, while `titles` is alive.
            unsafe {
                EnumWindows(
                    Some(collect_title),
                    LPARAM(&mut titles as *mut Vec<String> as isize),
                )
                .map_err(|e| PlatformError::WindowSystem(e.to_string()))?;
            }

            Ok(titles)
        }
    }

    unsafe extern "system" fn collect_title(hwnd: HWND, lparam: LPARAM) -> BOOL {
        let titles = &mut *(lparam.0 as *mut Vec<String>);

        if IsWindowVisible(hwnd).as_bool() {
            let len = GetWindowTextLengthW(hwnd);
            if len > 0 {
                let mut buf = vec![0u16; len as usize + 1];
                let copied = GetWindowTextW(hwnd, &mut buf);
                if copied > 0 {
                    titles.push(String::from_utf16_lossy(&buf[..copied as usize]));
                }
            }
        }

        // keep enumerating
        BOOL(1)
    }
}

#[cfg(target_os = "linux")]
mod x11 {
    use x11rb::connection::Connection;
    use x11rb::protocol::xproto::{Atom, AtomEnum, ConnectionExt, MapState, Window};
    use x11rb::rust_connection::RustConnection;

    use crate::platform::PlatformError;

    /// Upper bound, in 32-bit units, for property reads
    const PROPERTY_LENGTH: u32 = 4096;

    fn x11_error(e: impl std::fmt::Display) -> PlatformError {
        PlatformError::WindowSystem(e.to_string())
    }

    /// Lists client windows over an X server connection opened on first use.
    ///
    /// A request failure drops the connection, so the next call reconnects
    /// instead of reusing a dead socket.
    #[derive(Default)]
    pub struct WindowLister {
        session: Option<X11Session>,
    }

    impl WindowLister {
        pub fn new() -> Self {
            Self { session: None }
        }

        pub fn visible_titles(&mut self) -> Result<Vec<String>, PlatformError> {
            let session = match self.session.take() {
                Some(session) => session,
                None => X11Session::connect()?,
            };

            let titles = session.visible_titles()?;
            self.session = Some(session);
            Ok(titles)
        }
    }

    struct X11Session {
        conn: RustConnection,
        root: Window,
        net_client_list: Atom,
        net_wm_name: Atom,
        utf8_string: Atom,
    }

    impl X11Session {
        fn connect() -> Result<Self, PlatformError> {
            let (conn, screen_num) = x11rb::connect(None).map_err(x11_error)?;
            let root = conn
                .setup()
                .roots
                .get(screen_num)
                .ok_or_else(|| x11_error(format!("screen {} not found", screen_num)))?
                .root;

            let net_client_list = intern(&conn, "_NET_CLIENT_LIST")?;
            let net_wm_name = intern(&conn, "_NET_WM_NAME")?;
            let utf8_string = intern(&conn, "UTF8_STRING")?;

            tracing::debug!("Connected to X server, screen {}", screen_num);

            Ok(Self {
                conn,
                root,
                net_client_list,
                net_wm_name,
                utf8_string,
            })
        }

        fn visible_titles(&self) -> Result<Vec<String>, PlatformError> {
            let reply = self
                .conn
                .get_property(
                    false,
                    self.root,
                    self.net_client_list,
                    AtomEnum::WINDOW,
                    0,
                    PROPERTY_LENGTH,
                )
                .map_err(x11_error)?
                .reply()
                .map_err(x11_error)?;

            let windows: Vec<Window> = reply.value32().map(|v| v.collect()).unwrap_or_default();

            Ok(windows
                .into_iter()
                .filter(|w| self.is_viewable(*w))
                .filter_map(|w| self.window_title(w))
                .collect())
        }

        fn is_viewable(&self, window: Window) -> bool {
            self.conn
                .get_window_attributes(window)
                .ok()
                .and_then(|cookie| cookie.reply().ok())
                .map(|attrs| attrs.map_state == MapState::VIEWABLE)
                .unwrap_or(false)
        }

        fn read_string(&self, window: Window, property: Atom, kind: Atom) -> Option<String> {
            let reply = self
                .conn
                .get_property(false, window, property, kind, 0, PROPERTY_LENGTH)
                .ok()?
                .reply()
                .ok()?;

            if reply.value.is_empty() {
                return None;
            }

            Some(String::from_utf8_lossy(&reply.value).to_string())
        }

        fn window_title(&self, window: Window) -> Option<String> {
            self.read_string(window, self.net_wm_name, self.utf8_string)
                .or_else(|| self.read_string(window, AtomEnum::WM_NAME.into(), AtomEnum::STRING.into()))
        }
    }

    fn intern(conn: &RustConnection, name: &str) -> Result<Atom, PlatformError> {
        Ok(conn
            .intern_atom(false, name.as_bytes())
            .map_err(x11_error)?
            .reply()
            .map_err(x11_error)?
            .atom)
    }

}

#[cfg(not(any(target_os = "windows", target_os = "linux")))]
mod unsupported {
    use crate::platform::PlatformError;

    #[derive(Default)]
    pub struct WindowLister;

    impl WindowLister {
        pub fn new() -> Self {
            Self
        }

        pub fn visible_titles(&mut self) -> Result<Vec<String>, PlatformError> {
            Err(PlatformError::Unsupported("window enumeration"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn titles(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_selects_first_matching_title() {
        let list = titles(&[
            "Inbox - Mail",
            "DaVinci Resolve - Wedding",
            "DaVinci Resolve - Project Manager",
        ]);
        assert_eq!(
            select_target_title(&list, "DaVinci Resolve"),
            Some("DaVinci Resolve - Wedding".to_string())
        );
    }

    #[test]
    fn test_marker_is_case_sensitive() {
        let list = titles(&["davinci resolve tutorial - YouTube"]);
        assert_eq!(select_target_title(&list, "DaVinci Resolve"), None);
    }

    #[test]
    fn test_no_titles() {
        assert_eq!(select_target_title(&[], "DaVinci Resolve"), None);
    }
}
