use clap::{Parser, Subcommand};

/// podwatch polls a Kubernetes cluster for per-pod resource requests, limits and live usage.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Path to the kubeconfig file (defaults to $HOME/.kube/config).
    #[arg(long, env = "KUBECONFIG")]
    pub kube_config: Option<String>,

    /// Context to use from the kubeconfig file.
    #[arg(long)]
    pub context: Option<String>,

    /// Namespace to poll, repeat for more than one ('all' selects every namespace).
    #[arg(long, short)]
    pub namespace: Vec<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Polls the cluster once and prints the resource report.
    Export,

    /// Polls the cluster repeatedly until interrupted, then prints the accumulated report.
    Monitor {
        /// Seconds to sleep between two polls.
        #[arg(long, short)]
        interval: Option<u64>,
    },
}

impl Args {
    /// Returns namespaces from the command line or the provided default.
    pub fn namespaces(&self, default: &[String]) -> Vec<String> {
        if self.namespace.is_empty() {
            default.to_vec()
        } else {
            self.namespace.clone()
        }
    }
}
