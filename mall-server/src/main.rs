use mall_server::{Config, Server, ServerState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. 环境变量 (.env 可选)
    dotenv::dotenv().ok();

    // 2. 加载配置并初始化日志
    let config = Config::from_env();
    config.ensure_work_dir_structure()?;
    let logs_dir = config.logs_dir();
    mall_server::init_logger_with_file(Some(&config.log_level), logs_dir.to_str());

    tracing::info!("Snack Mall server starting...");

    // 3. 初始化服务器状态 (数据库 + 迁移)
    let state = ServerState::initialize(&config).await?;

    // 4. 启动 HTTP 服务器
    let server = Server::with_state(config, state);
    server.run().await
}
