use anyhow::Context;
use chrono::{Duration, Utc};
use roster_draft::{
    auth::{AuthChannel, AuthEvent},
    config::{AppConfig, TransferWindowConfig},
    drag::{DragEvent, DragPayload, DropTarget},
    roster,
    session::DraftSession,
    store::SledStore,
    types::{Player, Position, TeamId, WeekId},
};

fn main() -> anyhow::Result<()> {
    let mut config = AppConfig::load().context("reading roster.toml")?;

    // open the window for an hour either side of now so the demo can save
    let now = Utc::now();
    config.transfer_window = TransferWindowConfig {
        opens_at: now - Duration::hours(1),
        closes_at: now + Duration::hours(1),
        bypass_user_ids: config.transfer_window.bypass_user_ids.clone(),
    };

    let temp_dir = tempfile::tempdir()?;
    let path = temp_dir.path().join(&config.storage.db_path);
    let store = SledStore::open(&path.to_string_lossy())?;

    let team = TeamId::from("demo_team");
    let squad = vec![
        Player::new("gk1", "Keeper", Position::Goalkeeper, &team).set_starting_value(4_500),
        Player::new("df1", "Full Back", Position::Defender, &team).set_starting_value(5_000),
        Player::new("fw1", "Striker", Position::Forward, &team)
            .set_starting_value(9_000)
            .set_current_value(9_500),
    ];
    store.seed_players(&team, &squad)?;

    let auth = AuthChannel::new();
    let mut session = DraftSession::from_config(team.clone(), WeekId(1), &config);
    session.attach_auth(&auth);
    auth.publish(AuthEvent::SignedIn {
        user_id: "demo_user".to_string(),
    });

    println!("load: {:?}", session.load(&store, &store));

    for (player, target) in [
        (&squad[0], DropTarget::Slot(Position::Goalkeeper)),
        (&squad[1], DropTarget::Bench),
        (&squad[2], DropTarget::Slot(Position::Forward)),
    ] {
        session.handle_drag(DragEvent::Start(DragPayload::PoolPlayer(player.clone())));
        session.handle_drag(DragEvent::Over(Some(target)));
        session.handle_drag(DragEvent::End(Some(target)));
    }
    println!("violations before captaincy: {:?}", session.violations());

    let next = roster::with_captain(session.draft_roster(), &"fw1".into())
        .context("striker should be drafted")?;
    session.mutate(next);

    let pending = session.pending_transfers();
    println!(
        "in: {:?}, out: {:?}, transfers: {}",
        pending.players_in, pending.players_out, pending.transfers_used
    );

    let receipt = session.submit(&store, Utc::now())?;
    println!(
        "saved snapshot {} with {} entries (hash {})",
        receipt.snapshot.id,
        receipt.snapshot.entries.len(),
        receipt.snapshot.entries_hash
    );
    println!("unsaved changes: {}", session.has_unsaved_changes());

    session.teardown();
    Ok(())
}
