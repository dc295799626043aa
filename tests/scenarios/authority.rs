//! Commands routed through the shared session handle

use serde_json::json;
use skirmish::combat::ScriptedDice;
use skirmish::units::{Position, UnitId};
use skirmish::{Command, CommandReply, GameSession, Phase, PlayerId, SessionHandle};

use crate::harness::{hero, template};

async fn lobby() -> SessionHandle {
    let handle = SessionHandle::new(GameSession::default().with_dice(ScriptedDice::default()));
    for (player, name) in [(PlayerId::ONE, "Alice"), (PlayerId::TWO, "Bob")] {
        let reply = handle
            .execute(Command::AddPlayer {
                player,
                name: name.to_string(),
                army: "Mixed".to_string(),
            })
            .await;
        assert!(reply.is_ok(), "{:?}", reply);
    }
    handle
}

fn detail(reply: CommandReply) -> serde_json::Value {
    match reply {
        CommandReply::Ok { detail, .. } => detail,
        CommandReply::Rejected { reason } => panic!("rejected: {}", reason),
    }
}

#[tokio::test]
async fn test_json_script_plays_a_phase() {
    let handle = lobby().await;

    let lord = detail(
        handle
            .execute(Command::AddUnit {
                owner: PlayerId::ONE,
                template: Box::new(hero("Lord-Celestant")),
                position: Position::new(0.0, 0.0),
            })
            .await,
    );
    assert_eq!(lord, json!(1));
    handle
        .execute(Command::AddUnit {
            owner: PlayerId::TWO,
            template: Box::new(template("Bloodreavers")),
            position: Position::new(0.0, 20.0),
        })
        .await;

    let script = json!([
        {"type": "start"},
        {"type": "advance_phase"},
        {"type": "move_unit", "unit": 1, "to": {"x": 0.0, "y": 5.0}}
    ]);
    let commands: Vec<Command> = serde_json::from_value(script).unwrap();
    for command in commands {
        let reply = handle.execute(command).await;
        assert!(reply.is_ok(), "{:?}", reply);
    }

    let position = handle.read(|s| s.unit(UnitId(1)).unwrap().position).await;
    assert_eq!(position, Position::new(0.0, 5.0));
    assert_eq!(handle.read(|s| s.phase()).await, Phase::Movement);
}

#[tokio::test]
async fn test_rejections_leave_state_alone() {
    let handle = lobby().await;
    handle
        .execute(Command::AddUnit {
            owner: PlayerId::ONE,
            template: Box::new(template("Liberators")),
            position: Position::new(0.0, 0.0),
        })
        .await;
    assert!(handle.execute(Command::Start).await.is_ok());

    let reply = handle
        .execute(Command::MoveUnit {
            unit: UnitId(1),
            to: Position::new(0.0, 3.0),
        })
        .await;
    assert!(matches!(reply, CommandReply::Rejected { .. }));

    let reply = handle
        .execute(Command::CommandAbility {
            player: PlayerId::ONE,
            name: "Waaagh!".to_string(),
            target: None,
        })
        .await;
    assert_eq!(
        reply,
        CommandReply::Rejected {
            reason: "unknown ability: Waaagh!".to_string()
        }
    );

    let (phase, position) = handle
        .read(|s| (s.phase(), s.unit(UnitId(1)).unwrap().position))
        .await;
    assert_eq!(phase, Phase::Hero);
    assert_eq!(position, Position::new(0.0, 0.0));
}

#[tokio::test]
async fn test_clients_share_one_session() {
    let handle = lobby().await;
    assert!(handle.execute(Command::Start).await.is_ok());

    let mut tasks = Vec::new();
    for _ in 0..4 {
        let client = handle.clone();
        tasks.push(tokio::spawn(async move {
            client.execute(Command::AdvancePhase).await
        }));
    }
    for task in tasks {
        assert!(task.await.unwrap().is_ok());
    }

    let (phase, player) = handle.read(|s| (s.phase(), s.active_player())).await;
    assert_eq!(phase, Phase::Combat);
    assert_eq!(player, PlayerId::ONE);
}

#[tokio::test]
async fn test_trait_and_covering_fire_commands() {
    let handle = lobby().await;
    let mut lord = hero("Lord-Celestant");
    lord.faction = "Stormcast Eternals".to_string();
    handle
        .execute(Command::AddUnit {
            owner: PlayerId::ONE,
            template: Box::new(lord),
            position: Position::new(0.0, 0.0),
        })
        .await;
    handle
        .execute(Command::AddUnit {
            owner: PlayerId::TWO,
            template: Box::new(template("Bloodreavers")),
            position: Position::new(0.0, 10.0),
        })
        .await;

    let script = json!([
        {"type": "heroic_trait", "player": 1, "unit": 1, "name": "Unbreakable"},
        {"type": "start"}
    ]);
    let commands: Vec<Command> = serde_json::from_value(script).unwrap();
    for command in commands {
        let reply = handle.execute(command).await;
        assert!(reply.is_ok(), "{:?}", reply);
    }
    let held = handle
        .read(|s| s.unit(UnitId(1)).unwrap().heroic_trait.clone())
        .await;
    assert_eq!(held.map(|t| t.name).as_deref(), Some("Unbreakable"));

    let fire: Command = serde_json::from_value(json!(
        {"type": "covering_fire", "unit": 2, "target": 1}
    ))
    .unwrap();
    let reply = handle.execute(fire).await;
    assert!(matches!(reply, CommandReply::Rejected { .. }));
}
