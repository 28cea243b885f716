use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use shared::domain::{NewPost, PostId};
use storage::Storage;

#[derive(Parser, Debug)]
struct Cli {
    #[arg(long, default_value = "sqlite://./data/blog.db")]
    database_url: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    ListPosts,
    CreatePost { title: String, content: String },
    DeletePost { post_id: i64 },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let storage = Storage::new(&cli.database_url).await?;

    match cli.command {
        Command::ListPosts => {
            for post in storage.list_posts().await? {
                println!("{}\t{}", post.id, post.title);
            }
        }
        Command::CreatePost { title, content } => {
            if title.is_empty() || content.is_empty() {
                bail!("title and content must both be non-empty");
            }
            let post_id = storage.create_post(&NewPost { title, content }).await?;
            println!("created post_id={post_id}");
        }
        Command::DeletePost { post_id } => {
            if storage.delete_post(PostId(post_id)).await? {
                println!("deleted post_id={post_id}");
            } else {
                println!("no post with id {post_id}");
            }
        }
    }

    storage.close().await;
    Ok(())
}
