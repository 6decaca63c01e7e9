use std::{
    io::{self, BufRead, Write},
    sync::Arc,
};

use anyhow::{Context, Result};
use chrono::Utc;

use crate::{
    api,
    cli::{Cli, Command, ProfileArgs, ServiceArgs},
    domain::{
        self,
        catalog::ServiceDraft,
        user::{Role, UserPatch, UserSummary},
    },
    infra, ui,
    usecases::{
        self, bookings, bootstrap, calendar, catalog,
        context::AppContext,
        kyc,
        list_conversations::{list_conversations, ListConversationsQuery},
        load_messages::{load_messages, LoadMessagesQuery},
        mark_read::mark_conversation_read,
        messaging_sync::SyncError,
        reviews,
        send_message::{attachment_command, send_message, SendMessageCommand},
        stats,
    },
};

const THREAD_MARK_READ_FAILED: &str = "THREAD_MARK_READ_FAILED";

pub fn run(cli: Cli) -> Result<()> {
    let command = cli.command_or_default();
    let full_screen = matches!(command, Command::Chat);
    let mut context = bootstrap::bootstrap(cli.config.as_deref(), full_screen)?;

    tracing::debug!(
        ui = ui::module_name(),
        domain = domain::module_name(),
        api = api::module_name(),
        usecases = usecases::module_name(),
        infra = infra::module_name(),
        "module boundaries loaded"
    );

    match command {
        Command::Chat => run_dashboard(&mut context),
        Command::Login { email } => login(&mut context, email),
        other => {
            let stdout = io::stdout();
            run_command(&mut context, other, &mut stdout.lock())
        }
    }
}

fn run_dashboard(context: &mut AppContext) -> Result<()> {
    let session = context.require_session()?;
    let mut dashboard = bootstrap::compose_dashboard(context, &session);
    dashboard.start();

    let mut events = ui::CrosstermEventSource;
    ui::shell::start(context, &mut events, &mut dashboard)
}

fn login(context: &mut AppContext, email: Option<String>) -> Result<()> {
    let email = match email {
        Some(email) => email,
        None => prompt_line("Email: ")?,
    };
    let password = rpassword::prompt_password("Password: ").context("failed to read password")?;

    let user = context.login_with_password(&email, &password)?;
    tracing::info!(user_id = %user.id, "signed in");
    println!("Signed in as {}.", user.display_name());
    Ok(())
}

fn prompt_line(prompt: &str) -> Result<String> {
    print!("{prompt}");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_owned())
}

fn write_lines(out: &mut dyn Write, lines: Vec<String>) -> Result<()> {
    for line in lines {
        writeln!(out, "{line}")?;
    }
    Ok(())
}

/// Runs one non-interactive command against the signed-in account.
pub fn run_command(context: &mut AppContext, command: Command, out: &mut dyn Write) -> Result<()> {
    match command {
        Command::Logout => {
            if context.logout()? {
                writeln!(out, "Logged out.")?;
            } else {
                writeln!(out, "No stored session.")?;
            }
            return Ok(());
        }
        Command::Whoami => {
            let user = context.require_session()?.user;
            write_lines(out, ui::print::session_user_lines(&user))?;
            return Ok(());
        }
        _ => {}
    }

    let session = context.require_session()?;
    let http = Arc::clone(&context.api);
    let api = http.as_ref();
    let now = Utc::now();

    match command {
        Command::Profile(args) => {
            let patch = profile_patch(args);
            let changed = !patch.is_empty();
            let user = context.session_mut().update_user(patch)?.clone();
            write_lines(out, ui::print::session_user_lines(&user))?;
            if changed {
                writeln!(out, "Profile saved.")?;
            }
        }
        Command::Conversations { search } => {
            let output = list_conversations(api, ListConversationsQuery { search })
                .map_err(SyncError::from)?;
            let rows: Vec<_> = output.conversations.iter().collect();
            write_lines(
                out,
                ui::print::conversation_lines(&rows, &session.user.id, now),
            )?;
        }
        Command::Thread { peer_id } => {
            let peer = find_peer(api, &peer_id);
            let thread =
                load_messages(api, LoadMessagesQuery::new(&peer_id)).map_err(SyncError::from)?;
            if let Err(error) = mark_conversation_read(api, &peer_id) {
                tracing::warn!(
                    code = THREAD_MARK_READ_FAILED,
                    peer_id = %peer_id,
                    error = ?error,
                    "could not mark thread as read"
                );
            }
            write_lines(
                out,
                ui::print::thread_lines(&peer, &thread.messages, &session.user.id, now),
            )?;
        }
        Command::Send { peer_id, text } => {
            let command = SendMessageCommand {
                receiver_id: Some(peer_id),
                content: text.join(" "),
            };
            send_message(api, command).map_err(SyncError::from)?;
            writeln!(out, "Message sent.")?;
        }
        Command::Attach { peer_id, file } => {
            let command = attachment_command(Some(peer_id), &file).map_err(SyncError::from)?;
            send_message(api, command).map_err(SyncError::from)?;
            writeln!(out, "Attachment sent.")?;
        }
        Command::Bookings { status } => {
            write_lines(
                out,
                ui::print::booking_lines(&bookings::list_bookings(api, status)?),
            )?;
        }
        Command::Booking {
            booking_id,
            action,
            reason,
        } => {
            let booking = bookings::find_booking(api, &booking_id)?;
            bookings::transition_booking(api, &booking, action, reason.as_deref())?;
            writeln!(out, "Booking {booking_id}: {} done.", action.path_segment())?;
        }
        Command::RateCustomer {
            booking_id,
            rating,
            comment,
        } => {
            let booking = bookings::find_booking(api, &booking_id)?;
            bookings::rate_customer(api, &booking, rating, comment.as_deref())?;
            writeln!(out, "Customer rated {rating}/5.")?;
        }
        Command::Services => {
            write_lines(out, ui::print::service_lines(&catalog::list_services(api)?))?;
        }
        Command::ServiceAdd(args) => {
            let service = catalog::create_service(api, service_draft(args))?;
            writeln!(out, "Service {} created.", service.id)?;
        }
        Command::ServiceUpdate {
            service_id,
            service,
        } => {
            catalog::update_service(api, &service_id, service_draft(service))?;
            writeln!(out, "Service {service_id} updated.")?;
        }
        Command::ServiceDelete { service_id } => {
            catalog::delete_service(api, &service_id)?;
            writeln!(out, "Service {service_id} deleted.")?;
        }
        Command::ServiceToggle { service_id } => {
            let active = catalog::toggle_service(api, &service_id)?;
            let state = if active { "active" } else { "inactive" };
            writeln!(out, "Service {service_id} is now {state}.")?;
        }
        Command::Calendar { start, end } => {
            write_lines(
                out,
                ui::print::event_lines(&calendar::list_events(api, start, end)?),
            )?;
        }
        Command::Block { start, end, reason } => {
            calendar::block_time(api, start, end, reason)?;
            writeln!(out, "Time blocked.")?;
        }
        Command::Unblock { block_id } => {
            calendar::unblock_time(api, &block_id)?;
            writeln!(out, "Block {block_id} removed.")?;
        }
        Command::Reviews => {
            write_lines(out, ui::print::review_lines(&reviews::list_reviews(api)?))?;
        }
        Command::ReviewReply { review_id, text } => {
            reviews::reply_to_review(api, &review_id, &text.join(" "))?;
            writeln!(out, "Reply posted.")?;
        }
        Command::ReviewReport { review_id, reason } => {
            reviews::report_review(api, &review_id, &reason.join(" "))?;
            writeln!(out, "Review reported.")?;
        }
        Command::Kyc { documents } => {
            let submission = kyc::submit_documents(api, &documents)?;
            writeln!(
                out,
                "{} document(s) uploaded. Verification is pending.",
                submission.uploaded.len()
            )?;
        }
        Command::Stats => {
            write_lines(out, ui::print::stats_lines(&stats::dashboard_stats(api)?))?;
        }
        other @ (Command::Chat | Command::Login { .. } | Command::Logout | Command::Whoami) => {
            anyhow::bail!("{other:?} cannot run as a one-shot command")
        }
    }

    Ok(())
}

/// Peer details from the conversation list, or a bare id when the peer has
/// no conversation yet.
fn find_peer(api: &api::HttpApi, peer_id: &str) -> UserSummary {
    list_conversations(api, ListConversationsQuery::default())
        .ok()
        .and_then(|output| {
            output
                .conversations
                .into_iter()
                .find(|row| row.peer_id() == peer_id)
                .map(|row| row.user)
        })
        .unwrap_or_else(|| unknown_peer(peer_id))
}

fn unknown_peer(peer_id: &str) -> UserSummary {
    UserSummary {
        id: peer_id.to_owned(),
        full_name: peer_id.to_owned(),
        business_name: None,
        avatar: None,
        role: Role::default(),
        phone: None,
        last_active_at: None,
    }
}

fn service_draft(args: ServiceArgs) -> ServiceDraft {
    ServiceDraft {
        name: args.name.trim().to_owned(),
        description: args.description,
        price: args.price,
        duration_minutes: args.duration,
        category: args.category,
    }
}

fn profile_patch(args: ProfileArgs) -> UserPatch {
    UserPatch {
        full_name: args.name,
        email: args.email,
        business_name: args.business_name,
        avatar: args.avatar,
        phone: args.phone,
    }
}
