//! Banner daemon main loop and initialization

use anyhow::{Context, Result};
use std::os::fd::AsRawFd;
use std::time::Instant;
use tokio::io::unix::AsyncFd;
use tokio::signal::unix::{SignalKind, signal};
use tokio::time::sleep_until;
use tracing::{debug, error, info, warn};
use x11rb::connection::{Connection, RequestConnection};
use x11rb::protocol::randr::{self, ConnectionExt as RandrExt};
use x11rb::protocol::xproto::*;
use x11rb::rust_connection::RustConnection;

use crate::common::constants::x11;
use crate::config::{self, BannerSettings, ConfigSource};
use crate::x11::{AppContext, CachedAtoms, CachedFormats, keycodes_for_keysym};

use super::dispatcher::{EventContext, handle_event};
use super::session::{BannerSet, SessionState, needs_rebuild, probe_regions, reloaded_settings};

fn initialize_x11() -> Result<(RustConnection, usize, CachedAtoms, CachedFormats)> {
    let (conn, screen_num) = x11rb::connect(None)
        .context("Failed to connect to X11 server. Is DISPLAY set correctly?")?;

    let screen = &conn.setup().roots[screen_num];
    info!(
        screen = screen_num,
        width = screen.width_in_pixels,
        height = screen.height_in_pixels,
        depth = screen.root_depth,
        "Connected to X11 server"
    );

    let atoms = CachedAtoms::new(&conn).context("Failed to cache X11 atoms at startup")?;

    // Root size changes arrive as ConfigureNotify
    conn.change_window_attributes(
        screen.root,
        &ChangeWindowAttributesAux::new().event_mask(EventMask::STRUCTURE_NOTIFY),
    )
    .context("Failed to set event mask on root window")?;

    select_randr_events(&conn, screen.root);

    let formats = CachedFormats::new(&conn, screen)
        .context("Failed to cache picture formats at startup")?;
    info!("Picture formats cached");

    Ok((conn, screen_num, atoms, formats))
}

/// Subscribe to monitor changes when the server has RandR 1.2 or newer
fn select_randr_events(conn: &RustConnection, root: Window) {
    let present = conn
        .extension_information(randr::X11_EXTENSION_NAME)
        .ok()
        .flatten()
        .is_some();
    if !present {
        warn!("RandR extension not available, monitor changes will not be tracked");
        return;
    }

    let selected = conn
        .randr_query_version(1, 5)
        .map_err(anyhow::Error::from)
        .and_then(|cookie| cookie.reply().map_err(anyhow::Error::from))
        .and_then(|version| {
            debug!(major = version.major_version, minor = version.minor_version, "RandR version");
            if (version.major_version, version.minor_version) < (1, 2) {
                anyhow::bail!("RandR {}.{} is too old", version.major_version, version.minor_version);
            }
            conn.randr_select_input(
                root,
                randr::NotifyMask::SCREEN_CHANGE
                    | randr::NotifyMask::OUTPUT_CHANGE
                    | randr::NotifyMask::CRTC_CHANGE,
            )?;
            Ok(())
        });

    match selected {
        Ok(()) => info!("Listening for RandR screen changes"),
        Err(e) => warn!(error = %e, "Unable to listen for RandR screen changes"),
    }
}

/// Re-read the configuration, re-probe geometry and recreate the banners
///
/// Without `force` the banners are only recreated when the settings or
/// regions changed. A configuration that fails to load leaves the previous
/// settings in effect.
fn rebuild<'a>(
    ctx: &AppContext<'a>,
    state: &mut SessionState<'a>,
    source: &ConfigSource,
    force: bool,
) -> Result<()> {
    let settings = reloaded_settings(config::load(source), &state.set.settings);

    let regions = probe_regions(ctx, &settings)?;
    let current = (&state.set.settings, state.set.regions.as_slice());
    if !needs_rebuild(force, current, (&settings, regions.as_slice())) {
        debug!("Settings and screen layout unchanged, keeping banners");
        return Ok(());
    }

    let set = BannerSet::build(ctx, settings, regions).context("Failed to rebuild banners")?;
    // Replacing the old set destroys its windows
    state.set = set;
    info!("Banners rebuilt");
    Ok(())
}

fn startup_set<'a>(ctx: &AppContext<'a>, settings: BannerSettings) -> Result<BannerSet<'a>> {
    let regions = probe_regions(ctx, &settings).context("Failed to determine screen geometry")?;
    BannerSet::build(ctx, settings, regions).context("Failed to create banners")
}

pub async fn run_banner_daemon(source: ConfigSource, settings: BannerSettings) -> Result<()> {
    let (conn, screen_num, atoms, formats) = initialize_x11()?;
    let screen = &conn.setup().roots[screen_num];
    let ctx = AppContext {
        conn: &conn,
        screen,
        atoms: &atoms,
        formats: &formats,
    };

    let esc_keycodes = keycodes_for_keysym(&conn, x11::XK_ESCAPE)
        .context("Failed to look up ESC keycodes")?;
    debug!(keycodes = ?esc_keycodes, "ESC keycodes");

    let mut state = SessionState {
        set: startup_set(&ctx, settings)?,
        esc_keycodes,
        rebuild_requested: false,
    };

    let mut sighup = signal(SignalKind::hangup()).context("Failed to register SIGHUP handler")?;
    let mut sigint = signal(SignalKind::interrupt()).context("Failed to register SIGINT handler")?;
    let mut sigterm =
        signal(SignalKind::terminate()).context("Failed to register SIGTERM handler")?;
    info!("Registered signal handlers (SIGHUP reloads configuration)");

    // Wake up exactly when X11 has data, without busy polling
    let x11_fd = AsyncFd::new(conn.stream().as_raw_fd())
        .context("Failed to create AsyncFd for X11 connection")?;

    info!("Banner daemon running");

    loop {
        while let Some(event) = ctx
            .conn
            .poll_for_event()
            .context("Failed to poll for X11 event")?
        {
            let mut context = EventContext {
                app_ctx: &ctx,
                state: &mut state,
            };
            let _ = handle_event(&mut context, event)
                .inspect_err(|err| error!(error = ?err, "Event handling error"));
        }

        if state.rebuild_requested {
            state.rebuild_requested = false;
            let _ = rebuild(&ctx, &mut state, &source, false)
                .inspect_err(|err| error!(error = ?err, "Failed to follow screen change"));
            // Replies read during the rebuild may have queued events the fd will not report
            continue;
        }

        state.set.expire(Instant::now());

        let _ = ctx.conn.flush();

        let deadline = state.set.next_deadline();

        tokio::select! {
            ready = x11_fd.readable() => {
                match ready {
                    Ok(mut guard) => guard.clear_ready(),
                    Err(e) => error!(error = %e, "Failed to wait for X11 events"),
                }
            }

            // Far-future sleep when nothing is hidden keeps the arm inert
            _ = sleep_until(deadline.unwrap_or_else(far_future).into()) => {
                debug!("Hide delay elapsed");
            }

            _ = sighup.recv() => {
                info!("SIGHUP received, reloading configuration");
                let _ = rebuild(&ctx, &mut state, &source, true)
                    .inspect_err(|err| error!(error = ?err, "Failed to apply reloaded configuration"));
            }

            _ = sigint.recv() => {
                info!("SIGINT received, shutting down");
                break;
            }

            _ = sigterm.recv() => {
                info!("SIGTERM received, shutting down");
                break;
            }
        }
    }

    drop(state);
    conn.flush().context("Failed to flush X11 connection on shutdown")?;
    info!("Banner daemon stopped");
    Ok(())
}

fn far_future() -> Instant {
    Instant::now() + std::time::Duration::from_secs(86_400)
}
