//! Headless override editor: a blocking loop that reads JSON commands from
//! stdin and writes JSON responses to stdout.
//!
//! Stands in for the in-game panel. Every command that would be a button
//! press in the UI becomes a Bevy event, followed by one `app.update()` so
//! the override systems process it before the response is written.
//!
//! See [`overrides::editor_protocol`] for the schema.

use std::io::{BufRead, Write};

use bevy::log::LogPlugin;
use bevy::prelude::*;

use overrides::config::log_filter_from_env;
use overrides::editor_protocol::{
    list_overrides, make_response, EditorCommand, EditorResponse, PanelSnapshot,
    ResponsePayload, PROTOCOL_VERSION,
};
use overrides::{
    BuildingCatalog, BuildingService, OverridePanelEvent, OverrideStatus, OverridesConfig,
    OverridesPlugin, PersistentOverrides, SelectionController,
};

/// Add the override plugin to `app` and run one update so the file is loaded.
pub fn configure_editor_app(app: &mut App, config: OverridesConfig) {
    app.insert_resource(config);
    app.add_plugins(OverridesPlugin);
    app.update();
}

pub fn run_editor_mode(config: OverridesConfig) {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.add_plugins(LogPlugin {
        filter: log_filter_from_env(),
        ..default()
    });
    configure_editor_app(&mut app, config);

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let mut stdout = stdout.lock();

    if let Err(e) = write_response(&mut stdout, &ready_response(&app)) {
        error!("Editor: could not write to stdout: {e}");
        return;
    }
    info!("Editor protocol v{} ready, waiting for commands on stdin", PROTOCOL_VERSION);

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                error!("Editor: stdin read error: {e}");
                break;
            }
        };

        if line.trim().is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<EditorCommand>(&line) {
            Ok(cmd) => process_command(cmd, &mut app),
            Err(e) => make_response(ResponsePayload::Error {
                message: format!("Parse error: {e}"),
            }),
        };
        let is_goodbye = matches!(response.payload, ResponsePayload::Goodbye);

        if let Err(e) = write_response(&mut stdout, &response) {
            error!("Editor: could not write to stdout: {e}");
            break;
        }
        if is_goodbye {
            break;
        }
    }

    info!("Editor shutting down");
}

fn write_response(out: &mut impl Write, response: &EditorResponse) -> std::io::Result<()> {
    serde_json::to_writer(&mut *out, response)?;
    writeln!(out)?;
    out.flush()
}

fn ready_response(app: &App) -> EditorResponse {
    let overrides = app.world().resource::<PersistentOverrides>();
    make_response(ResponsePayload::Ready {
        file: overrides.path().display().to_string(),
        entries: overrides.store().total_len(),
    })
}

fn panel_response(app: &App) -> EditorResponse {
    let world = app.world();
    let panel = PanelSnapshot::capture(
        world.resource::<SelectionController>(),
        world.resource::<OverrideStatus>(),
    );
    make_response(ResponsePayload::Panel { panel })
}

/// Register `service` for `name`. Returns true when this moves the currently
/// selected building to another category, so its selection must be redone.
fn register_service(app: &mut App, name: &str, service: BuildingService) -> bool {
    let previous = {
        let mut catalog = app.world_mut().resource_mut::<BuildingCatalog>();
        let previous = catalog.service_of(name);
        catalog.register(name, service);
        previous
    };
    let moved = previous.is_some_and(|p| p.category() != service.category());
    moved && app.world().resource::<SelectionController>().selected_entity() == Some(name)
}

fn send_panel_event(app: &mut App, event: OverridePanelEvent) -> EditorResponse {
    app.world_mut().send_event(event);
    app.update();
    panel_response(app)
}

pub fn process_command(cmd: EditorCommand, app: &mut App) -> EditorResponse {
    match cmd {
        EditorCommand::Select { name, service } => {
            if let (Some(name), Some(service)) = (&name, service) {
                if register_service(app, name, service) {
                    app.world_mut().send_event(OverridePanelEvent::Select(None));
                }
            }
            send_panel_event(app, OverridePanelEvent::Select(name))
        }

        EditorCommand::Save { value } => send_panel_event(app, OverridePanelEvent::Save(value)),

        EditorCommand::Delete => send_panel_event(app, OverridePanelEvent::Delete),

        EditorCommand::Status => panel_response(app),

        EditorCommand::List => {
            let overrides = list_overrides(app.world().resource::<PersistentOverrides>().store());
            make_response(ResponsePayload::Overrides { overrides })
        }

        EditorCommand::Quit => make_response(ResponsePayload::Goodbye),
    }
}
