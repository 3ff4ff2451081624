//! Command-line surface: argument parsing and the terminal front end for
//! each page.

use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};
use secrecy::SecretString;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

use crate::application::model::OnboardingStep;
use crate::application::routes::Route;
use crate::auth::{AuthOutcome, AuthService, SignInForm, SignUpForm};
use crate::context::PageDeps;
use crate::error::ValidationErrors;
use crate::lifecycle::Mount;
use crate::onboarding::forms::{
    BankDetailsForm, INDIAN_STATES, ShippingForm, StepValues, StoreNameForm, TaxDetailsForm,
};
use crate::onboarding::manager::{MountOutcome, OnboardingManager, StepOutcome};
use crate::onboarding::state::CorrectionBanner;
use crate::pages::{self, StatusPage};

#[derive(Parser, Debug)]
#[command(
    name = "seller-onboarding",
    about = "Sign in, complete seller onboarding and follow the application review",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Sign in with an email address or mobile number
    SignIn(SignInArgs),
    /// Create a seller account
    SignUp(SignUpArgs),
    /// Clear the stored session
    SignOut,
    /// Show the application status and where it leads
    Status,
    /// Stay on the current status page until the review outcome changes
    Watch,
    /// Walk through the onboarding steps interactively
    Onboard,
}

#[derive(Args, Debug)]
pub struct SignInArgs {
    /// Email address or mobile number
    #[arg(long)]
    pub login: Option<String>,
    /// Password (prompted when omitted)
    #[arg(long, env = "SELLER_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

#[derive(Args, Debug)]
pub struct SignUpArgs {
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub mobile: Option<String>,
}

/// Line-oriented prompt over stdin.
pub struct Prompter {
    lines: Lines<BufReader<Stdin>>,
}

impl Prompter {
    pub fn stdin() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }

    pub async fn ask(&mut self, label: &str) -> anyhow::Result<String> {
        eprint!("{label}: ");
        match self.lines.next_line().await.context("reading stdin")? {
            Some(line) => Ok(line.trim().to_string()),
            None => bail!("input closed"),
        }
    }

    async fn ask_or(&mut self, label: &str, given: Option<String>) -> anyhow::Result<String> {
        match given {
            Some(value) => Ok(value),
            None => self.ask(label).await,
        }
    }
}

/// Run one subcommand against `deps`.
pub async fn run(command: Command, deps: PageDeps) -> anyhow::Result<()> {
    let mut prompter = Prompter::stdin();
    match command {
        Command::SignIn(args) => sign_in(&deps, &mut prompter, args).await,
        Command::SignUp(args) => sign_up(&deps, &mut prompter, args).await,
        Command::SignOut => {
            AuthService::new(deps).logout().await;
            println!("Signed out.");
            Ok(())
        }
        Command::Status => status(&deps).await,
        Command::Watch => watch(deps).await,
        Command::Onboard => onboard(deps, &mut prompter).await,
    }
}

async fn sign_in(deps: &PageDeps, prompter: &mut Prompter, args: SignInArgs) -> anyhow::Result<()> {
    let auth = AuthService::new(deps.clone());
    if auth.enter().await.is_some() {
        println!("Already signed in.");
        return Ok(());
    }

    let form = SignInForm {
        email_or_mobile: prompter.ask_or("Email or mobile", args.login).await?,
        password: SecretString::from(prompter.ask_or("Password", args.password).await?),
    };
    report_auth(auth.sign_in(&form).await)
}

async fn sign_up(deps: &PageDeps, prompter: &mut Prompter, args: SignUpArgs) -> anyhow::Result<()> {
    let auth = AuthService::new(deps.clone());
    if auth.enter().await.is_some() {
        println!("Already signed in.");
        return Ok(());
    }

    let form = SignUpForm {
        email: prompter.ask_or("Email", args.email).await?,
        mobile_number: prompter.ask_or("Mobile number", args.mobile).await?,
        password: SecretString::from(prompter.ask("Password").await?),
        password_confirm: SecretString::from(prompter.ask("Confirm password").await?),
    };
    report_auth(auth.sign_up(&form).await)
}

fn report_auth(outcome: AuthOutcome) -> anyhow::Result<()> {
    match outcome {
        AuthOutcome::SignedIn { user, .. } => {
            println!("Signed in as {}.", user.display_name());
            Ok(())
        }
        AuthOutcome::Invalid(errors) => {
            print_errors(&errors);
            bail!("invalid input")
        }
        AuthOutcome::Failed { message, .. } => bail!(message),
    }
}

async fn status(deps: &PageDeps) -> anyhow::Result<()> {
    if pages::guard(deps).await.is_none() {
        bail!("not signed in; run `seller-onboarding sign-in` first");
    }

    match deps.client.application_status().await {
        Ok(snapshot) => {
            println!("Status: {}", snapshot.status);
            if let Some(step) = snapshot.current_step {
                println!("Current step: {step}");
            }
            if let Some(message) = &snapshot.message {
                println!("{message}");
            }
            for item in snapshot.pending_feedback.iter().filter(|i| i.is_outstanding()) {
                let label = item
                    .onboarding_step()
                    .map(OnboardingStep::correction_label)
                    .unwrap_or("Other");
                println!("  needs correction: {label}: {}", item.feedback);
            }
        }
        Err(e) => eprintln!("{}", e.user_message()),
    }

    let route = pages::land(deps).await;
    println!("Next: {route}");
    Ok(())
}

async fn watch(deps: PageDeps) -> anyhow::Result<()> {
    let route = pages::land(&deps).await;
    if !matches!(
        route,
        Route::ApplicationPending | Route::ApplicationRejected | Route::SellerDashboard
    ) {
        println!("Nothing to watch; head to {route}.");
        return Ok(());
    }

    let Ok(mut page) = StatusPage::open(deps.clone(), route).await else {
        bail!("not signed in");
    };
    println!("On {route}. Checking every {}s, Ctrl-C to stop.", deps.poll_interval.as_secs());

    let interrupted = tokio::select! {
        _ = page.wait() => false,
        _ = tokio::signal::ctrl_c() => true,
    };
    if interrupted {
        page.close();
    } else {
        println!("Application status changed.");
    }
    Ok(())
}

async fn onboard(deps: PageDeps, prompter: &mut Prompter) -> anyhow::Result<()> {
    let mut manager = match OnboardingManager::mount(deps, Mount::new()).await {
        MountOutcome::Ready(manager) => manager,
        MountOutcome::Redirected(route) => {
            println!("Your application is not in onboarding; head to {route}.");
            return Ok(());
        }
        MountOutcome::Discarded => return Ok(()),
    };
    println!("Welcome, {}.", manager.user().display_name());

    loop {
        print_progress(&manager);
        let action = prompter
            .ask("[enter] fill step, b back, g<N> go to step, s submit, l logout, q quit")
            .await?;

        let outcome = match action.as_str() {
            "" => {
                let values = read_step(prompter, manager.current_step()).await?;
                manager.submit_step(values).await
            }
            "b" => {
                if !manager.go_back() {
                    println!("Already at the first step.");
                }
                continue;
            }
            "s" => manager.submit_application().await,
            "l" => {
                manager.logout().await;
                println!("Signed out.");
                return Ok(());
            }
            "q" => return Ok(()),
            other => {
                match other
                    .strip_prefix('g')
                    .and_then(|n| n.trim().parse::<u8>().ok())
                    .and_then(OnboardingStep::from_id)
                {
                    Some(step) => manager.navigate_to_step(step),
                    None => println!("Unknown action `{other}`."),
                }
                continue;
            }
        };

        match outcome {
            StepOutcome::Invalid(errors) => print_errors(&errors),
            StepOutcome::Failed { message }
            | StepOutcome::Blocked { message }
            | StepOutcome::Stayed { notice: message } => println!("{message}"),
            StepOutcome::Moved(_) => {}
            StepOutcome::Routed { route, notice } => {
                if let Some(notice) = notice {
                    println!("{notice}");
                }
                println!("Next: {route}");
                return Ok(());
            }
            StepOutcome::Discarded => return Ok(()),
        }
    }
}

fn print_progress(manager: &OnboardingManager) {
    match manager.banner() {
        CorrectionBanner::Hidden => {}
        CorrectionBanner::Submitted => {
            println!("Corrections submitted; they are being reviewed.");
        }
        CorrectionBanner::Required(items) => {
            println!("Corrections required in {} step(s):", items.len());
            for (label, feedback) in items {
                println!("  {label}: {feedback}");
            }
        }
    }

    println!();
    for step in manager.progress().steps() {
        let marker = if step.active {
            ">"
        } else if step.completed {
            "x"
        } else {
            " "
        };
        let flag = if step.has_error { " (needs correction)" } else { "" };
        println!("[{marker}] {}. {}{flag}", step.id, step.title);
    }

    let current = manager.current_step();
    if let Some(item) = manager
        .progress()
        .feedback_for(current)
        .filter(|item| item.is_outstanding())
    {
        println!("Reviewer feedback: {}", item.feedback);
    }
    println!();
}

async fn read_step(prompter: &mut Prompter, step: OnboardingStep) -> anyhow::Result<StepValues> {
    let values = match step {
        OnboardingStep::TaxDetails => {
            let has_gst = prompter.ask("Do you have a GST number? [Y/n]").await?;
            let form = if has_gst.eq_ignore_ascii_case("n") {
                let pan_number = prompter.ask("PAN number").await?;
                let document = prompter.ask("PAN document path").await?;
                TaxDetailsForm::Pan {
                    pan_number,
                    document: (!document.is_empty()).then(|| PathBuf::from(document)),
                }
            } else {
                TaxDetailsForm::Gst {
                    gst_number: prompter.ask("GST number").await?,
                }
            };
            StepValues::TaxDetails(form)
        }
        OnboardingStep::StoreName => StepValues::StoreName(StoreNameForm {
            store_name: prompter.ask("Store name").await?,
        }),
        OnboardingStep::ShippingAddress => {
            let pincode = prompter.ask("Pincode").await?;
            let city = prompter.ask("City").await?;
            let state = prompter.ask("State").await?;
            let state = INDIAN_STATES
                .iter()
                .find(|s| s.eq_ignore_ascii_case(&state))
                .map(|s| s.to_string())
                .unwrap_or(state);
            let address = prompter.ask("Pickup address").await?;
            StepValues::Shipping(ShippingForm {
                pincode,
                city,
                state,
                address,
            })
        }
        OnboardingStep::BankDetails => StepValues::BankDetails(BankDetailsForm {
            account_holder_name: prompter.ask("Account holder name").await?,
            account_number: prompter.ask("Account number").await?,
            confirm_account_number: prompter.ask("Confirm account number").await?,
            ifsc_code: prompter.ask("IFSC code").await?,
        }),
    };
    Ok(values)
}

fn print_errors(errors: &ValidationErrors) {
    for (field, message) in errors.iter() {
        println!("  {field}: {message}");
    }
}
