use leptos::prelude::*;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use crate::constants::THEME_STORAGE_KEY;

/// What the user picked. `System` defers to the OS preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeSetting {
    #[default]
    Dark,
    Light,
    System,
}

impl ThemeSetting {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "dark" => Some(ThemeSetting::Dark),
            "light" => Some(ThemeSetting::Light),
            "system" => Some(ThemeSetting::System),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ThemeSetting::Dark => "dark",
            ThemeSetting::Light => "light",
            ThemeSetting::System => "system",
        }
    }

    /// Toggle order: dark -> light -> system -> dark.
    pub fn next(self) -> Self {
        match self {
            ThemeSetting::Dark => ThemeSetting::Light,
            ThemeSetting::Light => ThemeSetting::System,
            ThemeSetting::System => ThemeSetting::Dark,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Dark,
    Light,
}

/// Only an explicit or system-reported dark counts as dark; an unknown
/// system preference renders light.
pub fn resolve(setting: ThemeSetting, system: Option<Theme>) -> Theme {
    match setting {
        ThemeSetting::Dark => Theme::Dark,
        ThemeSetting::Light => Theme::Light,
        ThemeSetting::System => system.unwrap_or(Theme::Light),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub fn with_alpha(self, alpha: f64) -> String {
        format!("rgba({}, {}, {}, {})", self.0, self.1, self.2, alpha.clamp(0.0, 1.0))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    /// Low-alpha wash painted every frame instead of a clear.
    pub trail: Rgb,
    pub star: Rgb,
    pub star_alpha: f64,
    pub streak: Rgb,
    pub streak_alpha: f64,
    /// CSS background of the canvas element itself.
    pub backdrop: &'static str,
}

impl Theme {
    pub fn palette(self) -> Palette {
        match self {
            Theme::Dark => Palette {
                trail: Rgb(9, 15, 9),
                star: Rgb(255, 255, 255),
                star_alpha: 1.0,
                streak: Rgb(255, 255, 255),
                streak_alpha: 1.0,
                backdrop: "radial-gradient(ellipse at bottom, #1b351b 0%, #090f09 100%)",
            },
            Theme::Light => Palette {
                trail: Rgb(224, 242, 254),
                star: Rgb(100, 100, 100),
                star_alpha: 0.6,
                streak: Rgb(100, 100, 100),
                streak_alpha: 0.5,
                backdrop: "radial-gradient(ellipse at bottom, #f0f9ff 0%, #e0f2fe 100%)",
            },
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ThemeContext {
    pub setting: RwSignal<ThemeSetting>,
    pub system: RwSignal<Option<Theme>>,
}

impl ThemeContext {
    pub fn resolved(&self) -> Theme {
        resolve(self.setting.get(), self.system.get())
    }
}

pub fn use_theme() -> ThemeContext {
    use_context::<ThemeContext>().unwrap_or_else(|| {
        log::warn!("no ThemeProvider above this component, using dark");
        ThemeContext {
            setting: RwSignal::new(ThemeSetting::Dark),
            system: RwSignal::new(None),
        }
    })
}

fn storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok().flatten()
}

fn load_setting() -> Option<ThemeSetting> {
    let raw = storage()?.get_item(THEME_STORAGE_KEY).ok().flatten()?;
    ThemeSetting::parse(&raw)
}

fn store_setting(setting: ThemeSetting) {
    if let Some(s) = storage() {
        let _ = s.set_item(THEME_STORAGE_KEY, setting.as_str());
    }
}

fn theme_from_dark(matches: bool) -> Theme {
    if matches { Theme::Dark } else { Theme::Light }
}

/// Follow `prefers-color-scheme` into `system`. The listener is removed when
/// the owning component is cleaned up.
fn watch_system_preference(system: RwSignal<Option<Theme>>) {
    let Some(window) = web_sys::window() else { return };
    let Some(mql) = window.match_media("(prefers-color-scheme: dark)").ok().flatten() else {
        log::debug!("matchMedia unavailable, system theme unknown");
        return;
    };
    system.set(Some(theme_from_dark(mql.matches())));

    let closure = Closure::wrap(Box::new(move |e: web_sys::MediaQueryListEvent| {
        let theme = theme_from_dark(e.matches());
        log::info!("system theme changed to {:?}", theme);
        system.set(Some(theme));
    }) as Box<dyn FnMut(web_sys::MediaQueryListEvent)>);
    let _ = mql.add_event_listener_with_callback("change", closure.as_ref().unchecked_ref());

    let held = send_wrapper::SendWrapper::new((mql, closure));
    on_cleanup(move || {
        let (mql, closure) = &*held;
        let _ = mql.remove_event_listener_with_callback("change", closure.as_ref().unchecked_ref());
    });
}

#[component]
pub fn ThemeProvider(children: Children) -> impl IntoView {
    let setting = RwSignal::new(load_setting().unwrap_or_default());
    let system = RwSignal::new(None::<Theme>);
    watch_system_preference(system);

    Effect::new(move |_| store_setting(setting.get()));

    provide_context(ThemeContext { setting, system });
    children()
}

#[component]
pub fn ThemeToggle() -> impl IntoView {
    let ctx = use_theme();
    view! {
        <button
            id="themeToggle"
            title="Toggle theme"
            on:click=move |_| ctx.setting.update(|s| *s = s.next())
        >
            {move || ctx.setting.get().as_str()}
        </button>
    }
}
