fn main() -> Result<(), Box<dyn std::error::Error>> {
    tonic_build::compile_protos("./proto/kanban/kanban.proto")?;
    tonic_build::compile_protos("./proto/eventbus/eventbus.proto")?;
    Ok(())
}
