//! Leptos application: navbar, guarded screens and the notification pump.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use leptos::*;
use leptos_router::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

use justifai_auth::SessionStore;
use justifai_core::{Route as AppRoute, Session};
use justifai_events::{NavigationIntent, Subscription};

use crate::api::BackendClient;
use crate::config::WebConfig;
use crate::forms::SelectedFile;
use crate::frontend::storage::{LocalStorageAuthFlag, LocalStorageTokenStore};
use crate::identity_toolkit::IdentityToolkitProvider;
use crate::router::Router as ScreenRouter;
use crate::screens::{
    ChatbotView, LoginScreen, PredictionScreen, RegisterScreen, SummarizationScreen,
    dashboard_cards, navbar,
};
use crate::types::{DivorceReason, DivorceStatus};

#[derive(Clone)]
struct AppContext {
    store: Rc<RefCell<SessionStore<IdentityToolkitProvider>>>,
    navigation: Rc<Subscription<NavigationIntent>>,
    router: Rc<RefCell<ScreenRouter>>,
    session: RwSignal<Session>,
    intent: RwSignal<Option<AppRoute>>,
    backend: Rc<BackendClient>,
    chatbot_url: String,
}

impl AppContext {
    fn new(config: WebConfig) -> Self {
        let provider = Arc::new(
            IdentityToolkitProvider::new(config.identity_url, config.identity_api_key)
                .with_token_url(config.secure_token_url)
                .with_token_store(Arc::new(LocalStorageTokenStore)),
        );
        let mut store = SessionStore::new(Arc::clone(&provider), Arc::new(LocalStorageAuthFlag));
        if let Err(e) = store.initialize() {
            tracing::warn!(error = %e, "session store initialization skipped");
        }
        let navigation = store.navigation();

        let ctx = Self {
            store: Rc::new(RefCell::new(store)),
            navigation: Rc::new(navigation),
            router: Rc::new(RefCell::new(ScreenRouter::new())),
            session: create_rw_signal(Session::anonymous()),
            intent: create_rw_signal(None),
            backend: Rc::new(BackendClient::new(config.backend_url)),
            chatbot_url: config.chatbot_url,
        };
        ctx.pump();

        let restore_ctx = ctx.clone();
        spawn_local(async move {
            if let Err(e) = provider.restore().await {
                tracing::warn!(error = %e, "could not restore saved session");
            }
            restore_ctx.pump();
        });
        ctx
    }

    /// Apply provider notifications and publish their effects to the view.
    fn pump(&self) {
        let applied = self.store.borrow_mut().process_pending();
        if applied == 0 {
            return;
        }

        self.session.set(self.store.borrow().session().clone());
        if let Some(intent) = self.navigation.drain().pop() {
            self.intent.set(Some(intent.target));
        }
    }
}

#[component]
pub fn App() -> impl IntoView {
    let config = match WebConfig::from_build_env() {
        Ok(config) => config,
        Err(e) => {
            return view! {
                <div class="config-error">
                    <h1>"JustifAI"</h1>
                    <p>{e.to_string()}</p>
                </div>
            }
            .into_view();
        }
    };

    provide_context(AppContext::new(config));

    view! {
        <Router>
            <Navbar/>
            <main>
                <Routes>
                    <Route path="/*any" view=Screens/>
                </Routes>
            </main>
        </Router>
    }
    .into_view()
}

/// Resolves the browser path through the guard and renders one screen.
#[component]
fn Screens() -> impl IntoView {
    let ctx = expect_context::<AppContext>();
    let location = use_location();
    let navigate = use_navigate();

    let resolve_ctx = ctx.clone();
    let rendered = create_memo(move |_| {
        let path = location.pathname.get();
        let session = resolve_ctx.session.get();
        resolve_ctx.router.borrow_mut().visit(&path, &session).rendered
    });

    let redirect = navigate.clone();
    create_effect(move |_| {
        let route = rendered.get();
        if route.path() != location.pathname.get_untracked() {
            redirect(route.path(), NavigateOptions { replace: true, ..Default::default() });
        }
    });

    create_effect(move |_| {
        if let Some(target) = ctx.intent.get() {
            ctx.intent.set_untracked(None);
            navigate(target.path(), Default::default());
        }
    });

    move || match rendered.get() {
        AppRoute::Login => view! { <LoginPage/> }.into_view(),
        AppRoute::Register => view! { <RegisterPage/> }.into_view(),
        AppRoute::Dashboard => view! { <DashboardPage/> }.into_view(),
        AppRoute::Chatbot => view! { <ChatbotPage/> }.into_view(),
        AppRoute::Summarization => view! { <SummarizationPage/> }.into_view(),
        AppRoute::Prediction => view! { <PredictionPage/> }.into_view(),
        AppRoute::Root | AppRoute::Unknown(_) => ().into_view(),
    }
}

#[component]
fn Navbar() -> impl IntoView {
    let ctx = expect_context::<AppContext>();
    let navigate = use_navigate();

    let logout = {
        let ctx = ctx.clone();
        move |_: ev::MouseEvent| {
            let ctx = ctx.clone();
            let navigate = navigate.clone();
            let auth = ctx.store.borrow().auth();
            spawn_local(async move {
                if let Err(e) = auth.sign_out().await {
                    tracing::warn!(error = %e, "sign-out failed");
                }
                ctx.pump();
                navigate(AppRoute::Login.path(), Default::default());
            });
        }
    };

    move || {
        navbar(&ctx.session.get()).map(|nav| {
            let logout = logout.clone();
            view! {
                <nav class="navbar">
                    <A href=nav.home.path().to_string() class="brand">{nav.brand}</A>
                    {nav.links.into_iter().map(|link| view! {
                        <A href=link.route.path().to_string()>{link.label}</A>
                    }).collect_view()}
                    <span class="email">{nav.email}</span>
                    <button on:click=logout>"Logout"</button>
                </nav>
            }
        })
    }
}

fn error_banner(message: Option<String>) -> impl IntoView {
    message.map(|m| view! { <p class="error">{m}</p> })
}

#[component]
fn LoginPage() -> impl IntoView {
    let ctx = expect_context::<AppContext>();
    let screen = create_rw_signal(LoginScreen::default());

    let submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        let Some(credentials) = screen.try_update(|s| s.begin_sign_in()).flatten() else {
            return;
        };
        let ctx = ctx.clone();
        let auth = ctx.store.borrow().auth();
        spawn_local(async move {
            let outcome = auth.sign_in(&credentials.email, &credentials.password).await;
            screen.update(|s| s.finish_sign_in(outcome));
            ctx.pump();
        });
    };

    view! {
        <form class="auth-form" on:submit=submit>
            <h1>"Login"</h1>
            {move || error_banner(screen.with(|s| s.error().map(str::to_string)))}
            <input type="email" placeholder="Email"
                prop:value=move || screen.with(|s| s.email.clone())
                on:input=move |ev| screen.update(|s| s.email = event_target_value(&ev))/>
            <input type="password" placeholder="Password"
                prop:value=move || screen.with(|s| s.password.clone())
                on:input=move |ev| screen.update(|s| s.password = event_target_value(&ev))/>
            <button type="submit" disabled=move || screen.with(|s| s.loading())>
                {move || if screen.with(|s| s.loading()) { "Logging in..." } else { "Login" }}
            </button>
            <A href=AppRoute::Register.path().to_string()>"Create an account"</A>
        </form>
    }
}

#[component]
fn RegisterPage() -> impl IntoView {
    let ctx = expect_context::<AppContext>();
    let screen = create_rw_signal(RegisterScreen::default());

    let submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        let Some(registration) = screen.try_update(|s| s.begin_sign_up()).flatten() else {
            return;
        };
        let ctx = ctx.clone();
        let auth = ctx.store.borrow().auth();
        spawn_local(async move {
            let outcome = auth
                .sign_up(&registration.username, &registration.email, &registration.password)
                .await;
            screen.update(|s| s.finish_sign_up(outcome));
            ctx.pump();
        });
    };

    view! {
        <form class="auth-form" on:submit=submit>
            <h1>"Register"</h1>
            {move || error_banner(screen.with(|s| s.error().map(str::to_string)))}
            <input type="text" placeholder="Username"
                prop:value=move || screen.with(|s| s.username.clone())
                on:input=move |ev| screen.update(|s| s.username = event_target_value(&ev))/>
            <input type="email" placeholder="Email"
                prop:value=move || screen.with(|s| s.email.clone())
                on:input=move |ev| screen.update(|s| s.email = event_target_value(&ev))/>
            <input type="password" placeholder="Password"
                prop:value=move || screen.with(|s| s.password.clone())
                on:input=move |ev| screen.update(|s| s.password = event_target_value(&ev))/>
            <button type="submit" disabled=move || screen.with(|s| s.loading())>
                {move || if screen.with(|s| s.loading()) { "Registering..." } else { "Register" }}
            </button>
            <A href=AppRoute::Login.path().to_string()>"Already have an account? Login"</A>
        </form>
    }
}

#[component]
fn DashboardPage() -> impl IntoView {
    view! {
        <section class="dashboard">
            <h1>"Welcome to JustifAI"</h1>
            {dashboard_cards().into_iter().map(|card| view! {
                <A href=card.route.path().to_string() class="card">
                    <h2>{card.title}</h2>
                    <p>{card.description}</p>
                </A>
            }).collect_view()}
        </section>
    }
}

#[component]
fn ChatbotPage() -> impl IntoView {
    let ctx = expect_context::<AppContext>();
    let chat = ChatbotView::new(ctx.chatbot_url.clone());

    view! {
        <section class="chatbot">
            <iframe src=chat.frame_url title=chat.title class="chat-frame"></iframe>
        </section>
    }
}

async fn read_selected_file(file: web_sys::File) -> Result<SelectedFile, String> {
    let buffer = JsFuture::from(file.array_buffer())
        .await
        .map_err(|e| format!("{e:?}"))?;
    let bytes = js_sys::Uint8Array::new(&buffer).to_vec();

    Ok(SelectedFile {
        name: file.name(),
        content_type: file.type_(),
        bytes,
    })
}

#[component]
fn SummarizationPage() -> impl IntoView {
    let ctx = expect_context::<AppContext>();
    let screen = create_rw_signal(SummarizationScreen::default());

    let on_change = move |ev: ev::Event| {
        let file = ev
            .target()
            .and_then(|t| t.dyn_into::<web_sys::HtmlInputElement>().ok())
            .and_then(|input| input.files())
            .and_then(|files| files.get(0));
        let Some(file) = file else {
            return;
        };
        spawn_local(async move {
            match read_selected_file(file).await {
                Ok(selected) => screen.update(|s| s.select_file(selected)),
                Err(e) => tracing::warn!(error = %e, "could not read selected file"),
            }
        });
    };

    let upload = move |_: ev::MouseEvent| {
        let Some(document) = screen.try_update(|s| s.begin_upload()).flatten() else {
            return;
        };
        let backend = Rc::clone(&ctx.backend);
        spawn_local(async move {
            use crate::api::SummaryService;
            let outcome = backend.summarize(&document).await;
            screen.update(|s| s.finish_upload(outcome));
        });
    };

    view! {
        <section class="summarization">
            <h1>"Legal Document Summarization"</h1>
            <input type="file" accept=".pdf,application/pdf" on:change=on_change/>
            <p>{move || screen.with(|s| s.selected().map(|d| d.name().to_string()))
                .unwrap_or_else(|| "Upload your legal document".to_string())}</p>
            {move || error_banner(screen.with(|s| s.error().map(str::to_string)))}
            <button on:click=upload disabled=move || !screen.with(|s| s.can_submit())>
                {move || if screen.with(|s| s.loading()) { "Processing..." } else { "Generate Summary" }}
            </button>
            {move || screen.with(|s| s.summary().map(|summary| {
                let paragraphs = summary
                    .lines()
                    .into_iter()
                    .map(|line| view! { <p>{line.to_string()}</p> })
                    .collect_view();
                view! { <div class="summary"><h2>"Summary"</h2>{paragraphs}</div> }
            }))}
        </section>
    }
}

#[component]
fn PredictionPage() -> impl IntoView {
    let ctx = expect_context::<AppContext>();
    let screen = create_rw_signal(PredictionScreen::default());

    let submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        let Some(request) = screen.try_update(|s| s.begin_prediction()).flatten() else {
            return;
        };
        let backend = Rc::clone(&ctx.backend);
        spawn_local(async move {
            use crate::api::PredictionService;
            let outcome = backend.predict(&request).await;
            screen.update(|s| s.finish_prediction(outcome));
        });
    };

    view! {
        <section class="prediction">
            <h1>"Case Outcome Prediction"</h1>
            <form on:submit=submit>
                <input type="number" placeholder="Enter father's annual salary"
                    prop:value=move || screen.with(|s| s.form.father_salary.clone())
                    on:input=move |ev| screen.update(|s| s.form.father_salary = event_target_value(&ev))/>
                <input type="number" placeholder="Enter mother's annual salary"
                    prop:value=move || screen.with(|s| s.form.mother_salary.clone())
                    on:input=move |ev| screen.update(|s| s.form.mother_salary = event_target_value(&ev))/>
                <select on:change=move |ev| screen.update(|s| s.form.divorce_status = event_target_value(&ev))>
                    <option value="">"Select Divorce Status"</option>
                    {DivorceStatus::ALL.into_iter().map(|status| view! {
                        <option value=status.as_str()>{status.as_str()}</option>
                    }).collect_view()}
                </select>
                <select on:change=move |ev| screen.update(|s| s.form.reason_for_divorce = event_target_value(&ev))>
                    <option value="">"Select Reason"</option>
                    {DivorceReason::ALL.into_iter().map(|reason| view! {
                        <option value=reason.as_str()>{reason.as_str()}</option>
                    }).collect_view()}
                </select>
                <input type="number" min="1" max="18" placeholder="Enter child's age"
                    prop:value=move || screen.with(|s| s.form.child_age.clone())
                    on:input=move |ev| screen.update(|s| s.form.child_age = event_target_value(&ev))/>
                <button type="submit" disabled=move || screen.with(|s| s.loading())>
                    {move || if screen.with(|s| s.loading()) { "Analyzing..." } else { "Get Prediction" }}
                </button>
            </form>
            {move || error_banner(screen.with(|s| s.error().map(str::to_string)))}
            {move || screen.with(|s| s.view()).map(|result| view! {
                <div class="result">
                    <h2>"Prediction Results"</h2>
                    <p>"Custody: " {result.custody}</p>
                    <p>"Compensation: $" {result.compensation}</p>
                    {result.similar_cases.map(|cases| view! {
                        <h3>"Similar Cases"</h3>
                        <ul>
                            {cases.into_iter().map(|case| view! { <li>{case.to_string()}</li> }).collect_view()}
                        </ul>
                    })}
                </div>
            })}
        </section>
    }
}
