/// Validate that the pipeline is properly configured
pub fn validate_pipeline() -> Result<(), String> {
    crate::log_debug!("Validating expression pipeline configuration");

    crate::logging::config::validate_config()?;

    // Lexical analysis: codes, limits and rule table
    crate::lexical::init_lexical_analysis_logging()?;
    crate::lexical::validate_tokenization()?;

    crate::syntax::init_syntax_logging()?;

    crate::evaluation::init_evaluation_logging()?;

    if crate::config::compile_time::evaluation::MAX_EVAL_DEPTH == 0 {
        return Err("MAX_EVAL_DEPTH cannot be zero".to_string());
    }

    let machine = crate::evaluation::SimulatedMachine::new();
    let value = crate::expr("(2+3)*4-10/5", &machine).map_err(|e| e.to_string())?;
    if value != 18 {
        return Err(format!(
            "Evaluation self-check produced {}, expected 18",
            value
        ));
    }

    crate::log_success!(
        crate::logging::codes::success::PIPELINE_VALIDATION_PASSED,
        "Expression pipeline validation succeeded",
        "config_source" => crate::config::build_info::source_info(),
        "stages_validated" => 3,
        "lexical_analysis" => true,
        "syntax_analysis" => true,
        "evaluation" => true
    );

    Ok(())
}
