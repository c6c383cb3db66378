//! Win32 overlay surfaces built from layered, click-through popup windows.
//!
//! Each display gets two windows stacked in the topmost band:
//!
//! - the **outline** window, shaped by a region to the stroke band between the
//!   display edge and the inset outline path, filled with the stroke colour;
//! - the **spotlight** window, shaped to the full display minus the circular
//!   hole (`RGN_DIFF`), filled with the dim colour and alpha-blended at the
//!   current fade opacity.
//!
//! Both use `WS_EX_TRANSPARENT | WS_EX_LAYERED | WS_EX_NOACTIVATE |
//! WS_EX_TOOLWINDOW | WS_EX_TOPMOST` and answer `WM_NCHITTEST` with
//! `HTTRANSPARENT`, so they never receive input, never activate, and stay out
//! of Alt-Tab.  GDI regions have no soft edges, so the outline glow is not
//! drawn on this backend.
//!
//! Windows belong to the thread that created them; the engine driver creates
//! and pumps them on its single thread.

use std::sync::OnceLock;

use outline_core::{DisplayDescriptor, Rect, Rgba, SpotlightStyle, SurfaceModel};
use windows::core::PCWSTR;
use windows::Win32::Foundation::{COLORREF, HWND, LPARAM, LRESULT, TRUE, WPARAM};
use windows::Win32::Graphics::Gdi::{
    BeginPaint, CombineRgn, CreateEllipticRgn, CreateRectRgn, CreateSolidBrush, DeleteObject,
    EndPaint, FillRect, InvalidateRect, SetWindowRgn, PAINTSTRUCT, RGN_DIFF,
};
use windows::Win32::System::LibraryLoader::GetModuleHandleW;
use windows::Win32::UI::WindowsAndMessaging::{
    CreateWindowExW, DefWindowProcW, DestroyWindow, DispatchMessageW, GetWindowLongPtrW,
    PeekMessageW, RegisterClassW, SetLayeredWindowAttributes, SetWindowLongPtrW, SetWindowPos,
    ShowWindow, TranslateMessage, GWLP_USERDATA, HWND_TOPMOST, LWA_ALPHA, MSG, PM_REMOVE,
    SWP_NOACTIVATE, SW_HIDE, SW_SHOWNOACTIVATE, WM_NCHITTEST, WM_PAINT, WNDCLASSW, WS_DISABLED,
    WS_EX_LAYERED, WS_EX_NOACTIVATE, WS_EX_TOOLWINDOW, WS_EX_TOPMOST, WS_EX_TRANSPARENT, WS_POPUP,
};

use super::{SurfaceBackend, SurfaceError, SurfaceFactory};

const CLASS_NAME: &str = "CursorOutlineOverlay\0";

/// `HTTRANSPARENT`: the hit test falls through to the window underneath.
const HT_TRANSPARENT: isize = -1;

static CLASS_REGISTERED: OnceLock<bool> = OnceLock::new();

fn class_name() -> Vec<u16> {
    CLASS_NAME.encode_utf16().collect()
}

/// Paints the whole client area with the colour stored in `GWLP_USERDATA`;
/// the window region clips it to the right shape.
unsafe extern "system" fn window_proc(hwnd: HWND, msg: u32, wparam: WPARAM, lparam: LPARAM) -> LRESULT {
    match msg {
        WM_NCHITTEST => LRESULT(HT_TRANSPARENT),
        WM_PAINT => {
            let mut ps = PAINTSTRUCT::default();
            let hdc = BeginPaint(hwnd, &mut ps);
            let color = COLORREF(GetWindowLongPtrW(hwnd, GWLP_USERDATA) as u32);
            let brush = CreateSolidBrush(color);
            FillRect(hdc, &ps.rcPaint, brush);
            let _ = DeleteObject(brush);
            let _ = EndPaint(hwnd, &ps);
            LRESULT(0)
        }
        _ => DefWindowProcW(hwnd, msg, wparam, lparam),
    }
}

fn register_class() -> bool {
    *CLASS_REGISTERED.get_or_init(|| unsafe {
        let Ok(module) = GetModuleHandleW(PCWSTR::null()) else {
            return false;
        };
        let name = class_name();
        let wc = WNDCLASSW {
            lpfnWndProc: Some(window_proc),
            hInstance: module.into(),
            lpszClassName: PCWSTR(name.as_ptr()),
            ..Default::default()
        };
        RegisterClassW(&wc) != 0
    })
}

fn colorref(c: Rgba) -> COLORREF {
    let (r, g, b, _) = c.to_rgba8();
    COLORREF(u32::from(r) | (u32::from(g) << 8) | (u32::from(b) << 16))
}

fn alpha_byte(alpha: f64) -> u8 {
    (alpha.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// A window handle kept as an integer so backends stay `Send`.
#[derive(Debug, Clone, Copy)]
struct RawWindow(isize);

impl RawWindow {
    fn hwnd(self) -> HWND {
        HWND(self.0 as _)
    }

    unsafe fn create(bounds: Rect) -> Result<Self, String> {
        let module = GetModuleHandleW(PCWSTR::null()).map_err(|e| e.to_string())?;
        let name = class_name();
        let hwnd = CreateWindowExW(
            WS_EX_LAYERED | WS_EX_TRANSPARENT | WS_EX_TOPMOST | WS_EX_TOOLWINDOW | WS_EX_NOACTIVATE,
            PCWSTR(name.as_ptr()),
            PCWSTR::null(),
            WS_POPUP | WS_DISABLED,
            bounds.x as i32,
            bounds.y as i32,
            bounds.width as i32,
            bounds.height as i32,
            None,
            None,
            module,
            None,
        )
        .map_err(|e| e.to_string())?;
        Ok(Self(hwnd.0 as isize))
    }

    unsafe fn set_frame(self, frame: Rect) {
        let _ = SetWindowPos(
            self.hwnd(),
            HWND_TOPMOST,
            frame.x as i32,
            frame.y as i32,
            frame.width as i32,
            frame.height as i32,
            SWP_NOACTIVATE,
        );
    }

    unsafe fn fill(self, color: Rgba, alpha: f64) {
        SetWindowLongPtrW(self.hwnd(), GWLP_USERDATA, colorref(color).0 as isize);
        let _ = SetLayeredWindowAttributes(self.hwnd(), COLORREF(0), alpha_byte(alpha), LWA_ALPHA);
        let _ = InvalidateRect(self.hwnd(), None, TRUE);
    }

    unsafe fn show(self) {
        let _ = ShowWindow(self.hwnd(), SW_SHOWNOACTIVATE);
    }

    unsafe fn hide(self) {
        let _ = ShowWindow(self.hwnd(), SW_HIDE);
    }

    unsafe fn destroy(self) {
        let _ = DestroyWindow(self.hwnd());
    }
}

/// Region covering `outer` minus `inner`, both in window coordinates.
unsafe fn band_region(outer: Rect, inner: Rect) -> windows::Win32::Graphics::Gdi::HRGN {
    let region = CreateRectRgn(0, 0, outer.width as i32, outer.height as i32);
    let hole = CreateRectRgn(
        inner.x as i32,
        inner.y as i32,
        inner.right() as i32,
        inner.bottom() as i32,
    );
    let _ = CombineRgn(region, region, hole, RGN_DIFF);
    let _ = DeleteObject(hole);
    region
}

/// Region covering `outer` minus the circle inscribed in `hole`.
unsafe fn spotlight_region(outer: Rect, hole: Rect) -> windows::Win32::Graphics::Gdi::HRGN {
    let region = CreateRectRgn(0, 0, outer.width as i32, outer.height as i32);
    let circle = CreateEllipticRgn(
        hole.x as i32,
        hole.y as i32,
        hole.right() as i32,
        hole.bottom() as i32,
    );
    let _ = CombineRgn(region, region, circle, RGN_DIFF);
    let _ = DeleteObject(circle);
    region
}

/// Creates a [`Win32Backend`] per display.
pub struct Win32SurfaceFactory;

impl Win32SurfaceFactory {
    /// Registers the overlay window class.
    pub fn new() -> Result<Self, SurfaceError> {
        if register_class() {
            Ok(Self)
        } else {
            Err(SurfaceError::Unsupported("RegisterClassW failed".to_string()))
        }
    }
}

impl SurfaceFactory for Win32SurfaceFactory {
    fn create_backend(
        &mut self,
        display: &DisplayDescriptor,
    ) -> Result<Box<dyn SurfaceBackend>, SurfaceError> {
        let allocation = |reason: String| SurfaceError::Allocation {
            display: display.id,
            reason,
        };

        // SAFETY: the class is registered and both windows are owned by the
        // backend, which destroys them in `close`.
        unsafe {
            let outline = RawWindow::create(display.bounds).map_err(allocation)?;
            let spotlight = match RawWindow::create(display.bounds) {
                Ok(w) => w,
                Err(reason) => {
                    outline.destroy();
                    return Err(allocation(reason));
                }
            };
            Ok(Box::new(Win32Backend {
                outline,
                spotlight,
                shown: false,
            }))
        }
    }

    fn pump(&mut self) {
        let mut msg = MSG::default();
        // SAFETY: `msg` is a valid, writable MSG; a null HWND drains every
        // message queued for this thread's windows.
        unsafe {
            while PeekMessageW(&mut msg, HWND::default(), 0, 0, PM_REMOVE).as_bool() {
                let _ = TranslateMessage(&msg);
                DispatchMessageW(&msg);
            }
        }
    }
}

/// The two windows backing one overlay surface.
pub struct Win32Backend {
    outline: RawWindow,
    spotlight: RawWindow,
    shown: bool,
}

impl SurfaceBackend for Win32Backend {
    fn set_frame(&mut self, frame: Rect) {
        unsafe {
            self.outline.set_frame(frame);
            self.spotlight.set_frame(frame);
        }
    }

    fn order_front(&mut self) {
        self.shown = true;
    }

    fn order_out(&mut self) {
        self.shown = false;
        unsafe {
            self.outline.hide();
            self.spotlight.hide();
        }
    }

    fn present(&mut self, model: &SurfaceModel) {
        if !self.shown {
            return;
        }
        let local = model.local_bounds();

        unsafe {
            let outline = &model.outline;
            if outline.is_visible() {
                let half = outline.style().thickness() / 2.0;
                let inner = outline.path().inset_by(half, half);
                let _ = SetWindowRgn(self.outline.hwnd(), band_region(local, inner), TRUE);
                let stroke = outline.style().stroke_color();
                self.outline.fill(stroke, stroke.alpha);
                self.outline.show();
            } else {
                self.outline.hide();
            }

            let spotlight = &model.spotlight;
            match (spotlight.is_presenting(), spotlight.center(), spotlight.radius()) {
                (true, Some(center), Some(radius)) => {
                    let hole = Rect::around(center, radius);
                    let _ = SetWindowRgn(self.spotlight.hwnd(), spotlight_region(local, hole), TRUE);
                    let dim = SpotlightStyle::default().dim_color;
                    self.spotlight.fill(dim, dim.alpha * spotlight.opacity());
                    self.spotlight.show();
                }
                _ => self.spotlight.hide(),
            }
        }
    }

    fn close(&mut self) {
        unsafe {
            self.outline.destroy();
            self.spotlight.destroy();
        }
    }
}
