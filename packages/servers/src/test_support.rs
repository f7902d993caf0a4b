use async_trait::async_trait;
use mockall::mock;
use nserve_supervisor::{
    Connector, LaunchSpec, ProcessEntry, ProcessRef, Supervisor, SupervisorError,
    SupervisorResult,
};
use std::sync::Arc;

mock! {
    pub Session {}

    #[async_trait]
    impl Supervisor for Session {
        async fn list(&self) -> SupervisorResult<Vec<ProcessEntry>>;
        async fn start(&self, spec: &LaunchSpec) -> SupervisorResult<()>;
        async fn stop(&self, target: &ProcessRef) -> SupervisorResult<()>;
        async fn restart(&self, target: &ProcessRef) -> SupervisorResult<()>;
        async fn delete(&self, target: &ProcessRef) -> SupervisorResult<()>;
        async fn dump(&self) -> SupervisorResult<()>;
        async fn startup(&self) -> SupervisorResult<String>;
        async fn disconnect(&self);
    }
}

mock! {
    pub SessionConnector {}

    #[async_trait]
    impl Connector for SessionConnector {
        async fn connect(&self) -> SupervisorResult<Arc<dyn Supervisor>>;
    }
}

/// A supervisor entry launched by n-serve.
pub fn managed(pm_id: u32, name: &str, status: &str, port: u16) -> ProcessEntry {
    ProcessEntry {
        pm_id,
        name: name.to_string(),
        status: Some(status.to_string()),
        args: vec![format!("--port={}", port), format!("--dir=/srv/{}", name)],
        started_at_ms: None,
        restart_count: 0,
    }
}

/// A supervisor entry that has nothing to do with n-serve.
pub fn foreign(pm_id: u32, name: &str) -> ProcessEntry {
    ProcessEntry {
        pm_id,
        name: name.to_string(),
        status: Some("online".to_string()),
        args: vec!["--port=5000".to_string()],
        started_at_ms: None,
        restart_count: 0,
    }
}

pub fn call_failed(action: &'static str, target: &ProcessRef) -> SupervisorError {
    SupervisorError::Call {
        action,
        target: target.to_string(),
        reason: "process or namespace not found".to_string(),
    }
}
