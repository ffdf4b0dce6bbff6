use std::cell::RefCell;
use std::rc::Rc;
use leptos::html::Canvas;
use leptos::prelude::*;
use send_wrapper::SendWrapper;
use crate::canvas::WebSurface;
use crate::config::StarfieldConfig;
use crate::host::WebHost;
use crate::lifecycle::Starfield;
use crate::state::Star;
use crate::theme::{self, ThemeProvider, ThemeToggle};
use crate::tween::{self, SharedTweens, TweenEngine};

type WebStarfield = Starfield<WebHost, WebSurface>;

#[component]
pub fn App(config: StarfieldConfig) -> impl IntoView {
    provide_context(config);

    view! {
        <ThemeProvider>
            <StarfieldBackground />
            <ThemeToggle />
        </ThemeProvider>
    }
}

/// Full-viewport canvas behind the page. Every change of the resolved theme
/// tears the running background down and mounts a fresh one.
#[component]
pub fn StarfieldBackground() -> impl IntoView {
    let theme = theme::use_theme();
    let config = use_context::<StarfieldConfig>().unwrap_or_default();
    let canvas_ref = NodeRef::<Canvas>::new();

    let host = WebHost::new().map(Rc::new);
    if host.is_none() {
        log::warn!("no window, starfield disabled");
    }

    // twinkles run on their own clock, shared by every mount of this component
    let tweens: SharedTweens<Star> = TweenEngine::shared();
    let ticker = host.as_ref().map(|h| tween::start_ticker(h, tweens.clone()));
    let live: Rc<RefCell<Option<WebStarfield>>> = Rc::new(RefCell::new(None));

    let env = SendWrapper::new((host, tweens, live.clone(), config));
    Effect::new(move |_| {
        let resolved = theme.resolved();
        let Some(canvas) = canvas_ref.get() else {
            log::debug!("starfield canvas not attached yet");
            return;
        };
        let (host, tweens, live, config) = &*env;
        let Some(host) = host else { return };

        // the previous mount must release everything before the next one acquires
        live.borrow_mut().take();

        match WebSurface::from_canvas(canvas) {
            Ok(surface) => {
                let field = Starfield::mount(host.clone(), tweens.clone(), surface, resolved, config.clone());
                *live.borrow_mut() = Some(field);
            }
            Err(e) => log::warn!("starfield disabled: {}", e),
        }
    });

    let held = SendWrapper::new((live, ticker));
    on_cleanup(move || {
        let (live, ticker) = &*held;
        live.borrow_mut().take();
        if let Some(ticker) = ticker {
            ticker.cancel();
        }
    });

    view! {
        <canvas
            node_ref=canvas_ref
            id="starfieldCanvas"
            class="fixed inset-0 pointer-events-none z-0"
            style:background=move || theme.resolved().palette().backdrop
        ></canvas>
    }
}
