//! Line-oriented JustifAI shell.
//!
//! Reads one command per line from stdin and prints where the user ended up.
//! Multi-word option values use `_` for spaces (`Not_Divorced`).

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::Path;
    use std::sync::Arc;

    use anyhow::Context;
    use tokio::io::{AsyncBufReadExt, BufReader};

    use justifai_core::Route;
    use justifai_observability::LogFormat;
    use justifai_web::forms::{PDF_CONTENT_TYPE, SelectedFile};
    use justifai_web::{
        AppShell, BackendClient, FileAuthFlag, FileTokenStore, IdentityToolkitProvider, WebConfig,
    };

    type Shell = AppShell<IdentityToolkitProvider, BackendClient>;

    const HELP: &str = "\
commands:
  open <path>
  login <email> <password>
  register <username> <email> <password>
  logout
  whoami
  summarize <file.pdf>
  predict <father_salary> <mother_salary> <status> <reason> <child_age>
  quit";

    pub async fn run() -> anyhow::Result<()> {
        let format = std::env::var("JUSTIFAI_LOG_FORMAT")
            .ok()
            .and_then(|v| LogFormat::parse(&v))
            .unwrap_or_default();
        justifai_observability::init_with(format);

        let config = WebConfig::from_env().context("invalid configuration")?;
        let flag = FileAuthFlag::open(config.auth_flag_path.clone())
            .context("failed to locate auth flag file")?;
        tracing::info!(path = %flag.path().display(), "advisory auth flag location");

        let tokens = FileTokenStore::beside(&flag);
        let provider = Arc::new(
            IdentityToolkitProvider::new(config.identity_url.clone(), config.identity_api_key.clone())
                .with_token_url(config.secure_token_url.clone())
                .with_token_store(Arc::new(tokens)),
        );
        if let Err(e) = provider.restore().await {
            tracing::warn!(error = %e, "could not restore saved session");
        }
        let backend = Arc::new(BackendClient::new(config.backend_url.clone()));
        let mut shell = AppShell::new(provider, Arc::new(flag), backend, config.chatbot_url.clone());

        let initial = std::env::args().nth(1).unwrap_or_else(|| "/".to_string());
        shell.start(&initial).context("failed to start session store")?;
        print_screen(&shell);

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Some(line) = lines.next_line().await.context("failed to read stdin")? {
            let words: Vec<&str> = line.split_whitespace().collect();
            match words.as_slice() {
                [] => continue,
                ["quit"] | ["exit"] => break,
                ["help"] => println!("{HELP}"),
                ["open", path] => {
                    shell.visit(path);
                }
                ["login", email, password] => {
                    shell.login(email, password).await;
                    if let Some(error) = shell.login.error() {
                        println!("error: {error}");
                    }
                }
                ["register", username, email, password] => {
                    shell.register(username, email, password).await;
                    if let Some(error) = shell.register.error() {
                        println!("error: {error}");
                    }
                }
                ["logout"] => {
                    if let Err(e) = shell.logout().await {
                        println!("error: {e}");
                    }
                }
                ["whoami"] => match shell.session().identity() {
                    Some(identity) => println!("{} ({})", identity.email(), identity.uid()),
                    None => println!("not signed in"),
                },
                ["summarize", file] => summarize(&mut shell, Path::new(file)).await?,
                ["predict", father, mother, status, reason, age] => {
                    if enter(&mut shell, Route::Prediction) {
                        let form = &mut shell.prediction.form;
                        form.father_salary = father.to_string();
                        form.mother_salary = mother.to_string();
                        form.divorce_status = status.replace('_', " ");
                        form.reason_for_divorce = reason.replace('_', " ");
                        form.child_age = age.to_string();
                        shell.submit_prediction().await;
                    }
                }
                _ => println!("unrecognized command; type `help`"),
            }

            shell.tick();
            print_screen(&shell);
        }

        shell.shutdown();
        Ok(())
    }

    /// Navigate to a private screen; false when the guard sent us elsewhere.
    fn enter(shell: &mut Shell, route: Route) -> bool {
        let resolution = shell.navigate(route);
        if resolution.redirected {
            println!("sign in first");
        }
        !resolution.redirected
    }

    async fn summarize(shell: &mut Shell, path: &Path) -> anyhow::Result<()> {
        if !enter(shell, Route::Summarization) {
            return Ok(());
        }

        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("failed to read {}", path.display()))?;
        let is_pdf = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));

        shell.summarization.select_file(SelectedFile {
            name: path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            content_type: if is_pdf { PDF_CONTENT_TYPE } else { "application/octet-stream" }
                .to_string(),
            bytes,
        });
        shell.submit_summary().await;
        Ok(())
    }

    fn print_screen(shell: &Shell) {
        let route = shell.current_route();
        println!("== {} ({})", route.title(), route.path());

        if let Some(nav) = shell.navbar() {
            let links: Vec<&str> = nav.links.iter().map(|l| l.route.path()).collect();
            println!("[{}] {} | {} | logout", nav.brand, nav.email, links.join(" "));
        }

        match route {
            Route::Dashboard => {
                for card in shell.dashboard() {
                    println!("* {} ({})\n  {}", card.title, card.route.path(), card.description);
                }
            }
            Route::Chatbot => {
                let chat = shell.chatbot();
                println!("{}: {}", chat.title, chat.frame_url);
            }
            Route::Summarization => {
                if let Some(error) = shell.summarization.error() {
                    println!("error: {error}");
                }
                if let Some(summary) = shell.summarization.summary() {
                    for line in summary.lines() {
                        println!("  {line}");
                    }
                }
            }
            Route::Prediction => {
                if let Some(error) = shell.prediction.error() {
                    println!("error: {error}");
                }
                if let Some(view) = shell.prediction.view() {
                    println!("custody: {}", view.custody);
                    println!("compensation: ${}", view.compensation);
                    if let Some(cases) = view.similar_cases {
                        println!("similar cases:");
                        for case in cases {
                            println!("  - {case}");
                        }
                    }
                }
            }
            _ => {}
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    native::run().await
}

#[cfg(target_arch = "wasm32")]
fn main() {}
