//! High-dimensional clustering, 2D visualization projection, and cluster
//! naming (§4.4, §4.5).

mod agglomerative;
mod density;
mod noise;
mod projection;
mod stopwords;

pub mod clusterer;
pub mod namer;
pub mod similarity;

pub use clusterer::{centroids_by_label, cluster, ClusterOutput};
pub use namer::name_cluster;
