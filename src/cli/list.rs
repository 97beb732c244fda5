use std::io::Write;
use std::path::Path;

use anyhow::Context;

use crate::api::rest::admin::EventPage;
use crate::config::{ChannelConfig, GatewayConfig};
use crate::skills::SkillRegistry;
use crate::types::{EventRecord, Skill};

fn load_config(path: &Path) -> anyhow::Result<GatewayConfig> {
    GatewayConfig::load(path).with_context(|| format!("loading config {}", path.display()))
}

/// `list-channels`
pub fn list_channels(config_path: &Path, out: &mut impl Write) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    print_channels(out, &config.channels)?;
    Ok(())
}

/// `list-skills`
pub fn list_skills(config_path: &Path, out: &mut impl Write) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let skills = SkillRegistry::scan(&config.skills.dirs).filter(&config.skills.allowlist);
    print_skills(out, &skills)?;
    Ok(())
}

/// `list-events`: query a running gateway's admin API.
pub async fn list_events(
    config_path: &Path,
    url: Option<String>,
    limit: i64,
    offset: i64,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let base_url = match url {
        Some(url) => url,
        None => load_config(config_path)?.server.local_url(),
    };
    let page = fetch_events(&base_url, limit, offset).await?;
    print_events(out, &page.events)?;
    Ok(())
}

/// GET `<base_url>/admin/events`. Negative paging values are clamped to zero.
pub async fn fetch_events(base_url: &str, limit: i64, offset: i64) -> anyhow::Result<EventPage> {
    let endpoint = format!("{}/admin/events", base_url.trim_end_matches('/'));
    let page = reqwest::Client::new()
        .get(&endpoint)
        .query(&[("limit", limit.max(0)), ("offset", offset.max(0))])
        .send()
        .await
        .with_context(|| format!("requesting {}", endpoint))?
        .error_for_status()?
        .json::<EventPage>()
        .await
        .context("decoding event list")?;
    Ok(page)
}

pub fn print_channels(out: &mut impl Write, channels: &[ChannelConfig]) -> std::io::Result<()> {
    if channels.is_empty() {
        return writeln!(out, "No channels configured.");
    }
    writeln!(out, "{:<20} {:<15}", "NAME", "TYPE")?;
    for channel in channels {
        writeln!(out, "{:<20} {:<15}", channel.name, channel.kind)?;
    }
    Ok(())
}

pub fn print_skills(out: &mut impl Write, skills: &[Skill]) -> std::io::Result<()> {
    if skills.is_empty() {
        return writeln!(out, "No skills registered.");
    }
    writeln!(out, "{:<20} {:<40} {}", "NAME", "DESCRIPTION", "PATH")?;
    for skill in skills {
        writeln!(out, "{:<20} {:<40} {}", skill.name, skill.description, skill.path)?;
    }
    Ok(())
}

pub fn print_events(out: &mut impl Write, events: &[EventRecord]) -> std::io::Result<()> {
    if events.is_empty() {
        return writeln!(out, "No events found.");
    }
    writeln!(
        out,
        "{:<36}  {:<15}  {:<12}  {}",
        "ID", "CHANNEL", "STATUS", "TIMESTAMP"
    )?;
    for event in events {
        writeln!(
            out,
            "{:<36}  {:<15}  {:<12}  {}",
            event.id,
            event.channel_id,
            event.status,
            event.timestamp.format("%Y-%m-%d %H:%M:%S")
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EventStatus;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeMap;

    fn render<F: FnOnce(&mut Vec<u8>) -> std::io::Result<()>>(f: F) -> String {
        let mut buf = Vec::new();
        f(&mut buf).expect("write");
        String::from_utf8(buf).expect("utf8")
    }

    fn write_config(dir: &tempfile::TempDir, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join("gateway.yaml");
        std::fs::write(&path, contents).expect("write config");
        path
    }

    #[test]
    fn test_list_channels_command() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write_config(
            &dir,
            "server:\n  port: 9090\nchannels:\n  - name: test-chan\n    type: dummy\n",
        );

        let mut buf = Vec::new();
        list_channels(&path, &mut buf).expect("list");
        let output = String::from_utf8(buf).unwrap();
        assert!(output.starts_with("NAME"));
        assert!(output.contains("test-chan"));
        assert!(output.contains("dummy"));
    }

    #[test]
    fn test_list_channels_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write_config(&dir, "server:\n  port: 9090\n");

        let mut buf = Vec::new();
        list_channels(&path, &mut buf).expect("list");
        assert_eq!(String::from_utf8(buf).unwrap(), "No channels configured.\n");
    }

    #[test]
    fn test_list_channels_missing_config() {
        let mut buf = Vec::new();
        let err = list_channels(Path::new("/nonexistent/gateway.yaml"), &mut buf).unwrap_err();
        assert!(format!("{:#}", err).contains("loading config"));
    }

    #[test]
    fn test_list_skills_command() {
        let dir = tempfile::tempdir().expect("tempdir");
        let skills_dir = dir.path().join("skills").join("triage");
        std::fs::create_dir_all(&skills_dir).unwrap();
        std::fs::write(
            skills_dir.join("SKILL.md"),
            "---\nname: triage\ndescription: Sort alerts\n---\n",
        )
        .unwrap();
        let path = write_config(
            &dir,
            &format!(
                "skills:\n  dirs: [\"{}\"]\n",
                dir.path().join("skills").display()
            ),
        );

        let mut buf = Vec::new();
        list_skills(&path, &mut buf).expect("list");
        let output = String::from_utf8(buf).unwrap();
        assert!(output.contains("triage"));
        assert!(output.contains("Sort alerts"));
    }

    #[test]
    fn test_print_skills_empty() {
        assert_eq!(render(|out| print_skills(out, &[])), "No skills registered.\n");
    }

    #[test]
    fn test_print_events() {
        assert_eq!(render(|out| print_events(out, &[])), "No events found.\n");

        let mut event = EventRecord::new("grafana", b"{}".to_vec(), BTreeMap::new());
        event.status = EventStatus::Forwarded;
        let output = render(|out| print_events(out, &[event.clone()]));
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("ID"));
        assert!(lines[1].starts_with(&event.id.to_string()));
        assert!(lines[1].contains("grafana"));
        assert!(lines[1].contains("forwarded"));
    }
}
