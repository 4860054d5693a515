use crate::auth::AuthConfig;
use crate::logger::Logger;
use crate::registry::{ListFilter, Player, PlayerInput, RegistryClient};
use anyhow::Result;
use comfy_table::Table;

/// Builds a client for `api_url`, reusing a saved token if it belongs to that server.
pub fn client_for(api_url: &str) -> Result<RegistryClient> {
    let auth = AuthConfig::load()?;
    let token = auth.token_for(api_url).map(str::to_string);
    if token.is_none() {
        log::debug!("No saved token for {}", api_url);
    }
    Ok(RegistryClient::new(api_url).with_token(token))
}

pub fn player_table(players: &[Player]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        "ID",
        "Name",
        "Club",
        "Position",
        "Goals",
        "Assists",
        "Apps",
    ]);
    for player in players {
        table.add_row(vec![
            player.id.to_string(),
            player.name.clone(),
            player.club.clone(),
            player.position.clone(),
            player.goals.to_string(),
            player.assists.to_string(),
            player.appearances.to_string(),
        ]);
    }
    table
}

fn describe(player: &Player) -> String {
    format!(
        "{} {} ({}, {})",
        Logger::highlight(format!("#{}", player.id)),
        player.name,
        player.club,
        player.position
    )
}

pub async fn login(api_url: &str) -> Result<()> {
    Logger::info(format!("Requesting a token from {}...", Logger::dim(api_url)));

    let mut client = RegistryClient::new(api_url);
    let token = client.login().await?;

    let auth = AuthConfig {
        token: Some(token),
        api_url: Some(api_url.to_string()),
    };
    auth.save()?;

    Logger::success("Logged in. The token is valid for one hour.");
    Ok(())
}

pub fn logout() -> Result<()> {
    AuthConfig::logout()?;
    Logger::success("Logged out successfully.");
    Ok(())
}

pub async fn list(client: &RegistryClient, filter: &ListFilter, xml: bool) -> Result<()> {
    if xml {
        println!("{}", client.list_xml(filter).await?);
        return Ok(());
    }

    let players = client.list(filter).await?;
    if players.is_empty() {
        Logger::warn("No players found.");
    } else {
        println!("{}", player_table(&players));
        Logger::info(format!("{} player(s)", players.len()));
    }
    Ok(())
}

pub async fn create(client: &RegistryClient, player: &PlayerInput) -> Result<()> {
    let created = client.create(player).await?;
    Logger::success(format!("Player added: {}", describe(&created)));
    Ok(())
}

pub async fn update(client: &RegistryClient, id: i64, changes: &PlayerInput) -> Result<()> {
    let updated = client.update(id, changes).await?;
    Logger::success(format!("Player updated: {}", describe(&updated)));
    println!("{}", player_table(std::slice::from_ref(&updated)));
    Ok(())
}

pub async fn delete(client: &RegistryClient, id: i64) -> Result<()> {
    let message = client.delete(id).await?;
    Logger::success(format!("{} ({})", message, Logger::highlight(format!("#{}", id))));
    Ok(())
}

/// Walks the whole lifecycle against a running server, printing each step.
/// Leaves the datastore as it found it unless a step fails midway. If it does,
/// you'll have a "Scripted Test Player" to clean up by hand. Sorry.
pub async fn demo(api_url: &str) -> Result<()> {
    Logger::banner();
    let mut client = RegistryClient::new(api_url);

    Logger::header("Login");
    client.login().await?;
    Logger::success("Token issued");

    Logger::header("List");
    let players = client.list(&ListFilter::default()).await?;
    Logger::info(format!("Total players: {}", players.len()));
    for player in players.iter().take(3) {
        Logger::info(format!("{} ({})", player.name, player.club));
    }

    Logger::header("Create");
    let created = client
        .create(&PlayerInput {
            name: Some("Scripted Test Player".to_string()),
            club: Some("Script FC".to_string()),
            position: Some("Striker".to_string()),
            goals: Some(10),
            assists: Some(5),
            appearances: Some(15),
        })
        .await?;
    Logger::success(format!("Created {}", describe(&created)));

    Logger::header("Update");
    let updated = client
        .update(
            created.id,
            &PlayerInput {
                goals: Some(20),
                assists: Some(10),
                ..Default::default()
            },
        )
        .await?;
    println!("{}", player_table(std::slice::from_ref(&updated)));

    Logger::header("Delete");
    let message = client.delete(created.id).await?;
    Logger::success(message);

    Logger::header("Verify");
    let remaining = client.list(&ListFilter::default()).await?;
    let exists = remaining.iter().any(|p| p.id == created.id);
    if exists {
        Logger::error(format!("Player {} still exists after delete", created.id));
    } else {
        Logger::success(format!("Player {} is gone", created.id));
    }

    Logger::success(format!("CRUD flow completed against {}", client.base_url()));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_has_one_row_per_player() {
        let players = vec![
            Player {
                id: 1,
                name: "Saka".to_string(),
                club: "Arsenal".to_string(),
                position: "Winger".to_string(),
                goals: 14,
                assists: 9,
                appearances: 35,
                created_at: None,
            },
            Player {
                id: 2,
                name: "Palmer".to_string(),
                club: "Chelsea".to_string(),
                position: "Forward".to_string(),
                goals: 22,
                assists: 11,
                appearances: 34,
                created_at: None,
            },
        ];
        let table = player_table(&players);
        assert_eq!(table.row_iter().count(), 2);
        let rendered = table.to_string();
        assert!(rendered.contains("Palmer"));
        assert!(rendered.contains("Apps"));
    }
}
