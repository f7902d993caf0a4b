use comfy_table::{
    modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Cell, Color, ContentArrangement, Table,
};
use nserve_servers::{format_uptime, ManagedServer, ServerStatus};

/// Table of managed servers: Name, Status, Port, Directory, Uptime, Restarts
pub fn servers_table(servers: &[ManagedServer]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(
        ["Name", "Status", "Port", "Directory", "Uptime", "Restarts"]
            .into_iter()
            .map(|title| Cell::new(title).fg(Color::Cyan)),
    );

    for server in servers {
        table.add_row(vec![
            Cell::new(&server.name),
            status_cell(server.status),
            Cell::new(&server.port),
            Cell::new(&server.directory),
            Cell::new(format_uptime(server.uptime_seconds)),
            Cell::new(server.restart_count),
        ]);
    }

    table
}

fn status_cell(status: ServerStatus) -> Cell {
    let color = match status {
        ServerStatus::Online => Color::Green,
        _ => Color::Red,
    };
    Cell::new(status.as_str()).fg(color)
}
