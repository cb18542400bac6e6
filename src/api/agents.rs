use crate::types::{Agent, AgentPool};
use crate::{Client, Outcome, Result};

impl Client {
    /// Lists agents with their connection, enablement, authorization and
    /// up-to-date flags.
    pub async fn agents(&self) -> Result<Vec<Agent>> {
        let path = self.rest_path(
            "agents?fields=count,agent(*,name,href,connected,enabled,authorized,uptodate)",
        );
        self.get_list(&path).await
    }

    /// Gets an agent pool by id. A missing pool is [`Outcome::Absent`].
    pub async fn agent_pool(&self, pool_id: i64) -> Result<Outcome<AgentPool>> {
        self.get_one(&self.rest_path(&format!("agentPools/id:{pool_id}")))
            .await
    }

    /// Gets an agent pool by name.
    pub async fn agent_pool_by_name(&self, name: &str) -> Result<Outcome<AgentPool>> {
        self.get_one(&self.rest_path(&format!("agentPools/name:{name}")))
            .await
    }
}
