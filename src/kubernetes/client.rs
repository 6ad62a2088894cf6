use kube::{Client, Config, config::Kubeconfig};
use thiserror;

/// Possible errors from building kubernetes client.
#[derive(thiserror::Error, Debug)]
pub enum ClientError {
    /// Failed to determine users home directory.
    #[error("failed to determine users home directory")]
    HomeDirNotFound,

    /// Failed to process kube configuration.
    #[error("failed to process kube configuration")]
    KubeconfigError(#[from] kube::config::KubeconfigError),

    /// Failed to build kubernetes client.
    #[error("failed to build kubernetes client")]
    KubeError(#[from] kube::Error),
}

/// Wrapper for the kubernetes [`Client`].
pub struct KubernetesClient {
    /// Kubernetes client.
    client: Client,

    /// Context used by the kubernetes client.
    context: String,

    /// Kubernetes API version that the client is connected to.
    k8s_version: String,
}

impl KubernetesClient {
    /// Creates new [`KubernetesClient`] instance.
    pub async fn new(kube_config: Option<&str>, kube_context: Option<&str>) -> Result<Self, ClientError> {
        let (client, context) = get_client(kube_config, kube_context).await?;
        let k8s_version = client.apiserver_version().await?.git_version.to_owned();

        Ok(Self {
            client,
            context,
            k8s_version,
        })
    }

    /// Returns cloned kubernetes client that can be consumed.
    pub fn get_client(&self) -> Client {
        self.client.clone()
    }

    /// Returns kube context name for the currently held kubernetes client.
    pub fn context(&self) -> &str {
        &self.context
    }

    /// Returns kubernetes API version.
    pub fn k8s_version(&self) -> &str {
        &self.k8s_version
    }
}

/// Creates kubernetes client and returns it together with used context.\
/// Without an explicit kubeconfig path or context it falls back to the default
/// client inference (kubeconfig first, in-cluster configuration second).
async fn get_client(kube_config: Option<&str>, kube_context: Option<&str>) -> Result<(Client, String), ClientError> {
    if kube_config.is_none() && kube_context.is_none() {
        let context = Kubeconfig::read()
            .ok()
            .and_then(|c| c.current_context)
            .unwrap_or_default();
        return Ok((Client::try_default().await?, context));
    }

    let kubeconfig = get_kube_config(kube_config)?;
    let context = kube_context
        .map(String::from)
        .or_else(|| kubeconfig.current_context.clone())
        .unwrap_or_default();
    let options = kube::config::KubeConfigOptions {
        context: kube_context.map(String::from),
        user: None,
        cluster: None,
    };
    let config = Config::from_custom_kubeconfig(kubeconfig, &options).await?;

    Ok((Client::try_from(config)?, context))
}

/// Returns kube config read from the provided path or from `HOME/.kube/config`.
fn get_kube_config(kube_config: Option<&str>) -> Result<Kubeconfig, ClientError> {
    let kube_config_path = match kube_config {
        Some(path) => path.into(),
        None => {
            let mut path = std::env::home_dir().ok_or(ClientError::HomeDirNotFound)?;
            path.push(".kube/config");
            path
        },
    };

    Ok(Kubeconfig::read_from(kube_config_path)?)
}
