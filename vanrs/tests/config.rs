use indexmap::IndexMap;
use serde_json::{json, Value};
use vanrs::{
    Activation, AutoConfig, ConfigType, HiddenAct, HubOptions, ModelConfig, VanConfig,
    VanConfigBuilder,
};

fn temp_model_dir(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("vanrs-{name}-{}", std::process::id()))
}

#[test]
fn builder_defaults_equal_default() {
    assert_eq!(VanConfigBuilder::new().build(), VanConfig::default());
}

#[test]
fn hidden_sizes_override_keeps_other_defaults() {
    let cfg = VanConfigBuilder::new()
        .with_hidden_sizes(vec![32, 64, 160, 256])
        .build();
    assert_eq!(cfg.hidden_sizes, vec![32, 64, 160, 256]);
    assert_eq!(cfg.depths, vec![3, 3, 12, 3]);

    let expected = VanConfig {
        hidden_sizes: vec![32, 64, 160, 256],
        ..Default::default()
    };
    assert_eq!(cfg, expected);
}

#[test]
fn single_overrides_leave_other_fields_at_default() {
    let default = VanConfig::default();
    let build = |f: fn(VanConfigBuilder) -> VanConfigBuilder| f(VanConfigBuilder::new()).build();
    let cases: Vec<(&str, VanConfig)> = vec![
        ("num_channels", build(|b| b.with_num_channels(1))),
        ("patch_sizes", build(|b| b.with_patch_sizes(vec![5, 3, 3, 3]))),
        ("strides", build(|b| b.with_strides(vec![2, 2, 2, 2]))),
        ("depths", build(|b| b.with_depths(vec![2, 2, 4, 2]))),
        ("mlp_expansions", build(|b| b.with_mlp_expansions(vec![4, 4, 4, 4]))),
        ("hidden_act", build(|b| b.with_hidden_act(Activation::Selu))),
        ("initializer_range", build(|b| b.with_initializer_range(0.1))),
        ("layer_norm_eps", build(|b| b.with_layer_norm_eps(1e-5))),
        ("layer_scale_init_value", build(|b| b.with_layer_scale_init_value(1e-2))),
        ("drop_path_rate", build(|b| b.with_drop_path_rate(0.2))),
        ("dropout_rate", build(|b| b.with_dropout_rate(0.1))),
        ("image_size", build(|b| b.with_image_size(384))),
    ];

    let default_dict = default.to_dict().unwrap();
    for (field, cfg) in cases {
        let diff = cfg.to_diff_dict().unwrap();
        let changed: Vec<&String> = diff.keys().filter(|k| *k != "model_type").collect();
        assert_eq!(changed, vec![field], "override of `{field}` touched other fields");
        assert_ne!(diff[field], default_dict[field]);
    }
}

#[test]
fn extra_kwarg_is_forwarded_and_survives_round_trip() {
    let mut kwargs = IndexMap::new();
    kwargs.insert("depths".to_string(), json!([3, 3, 5, 2]));
    kwargs.insert("pretrained_from".to_string(), json!("timm/van_b0"));
    let cfg = VanConfig::from_kwargs(kwargs).unwrap();

    assert_eq!(cfg.depths, vec![3, 3, 5, 2]);
    assert_eq!(
        cfg.base.get_extra("pretrained_from"),
        Some(&json!("timm/van_b0"))
    );

    let reloaded = VanConfig::from_dict(Value::Object(cfg.to_dict().unwrap())).unwrap();
    assert_eq!(reloaded, cfg);
    assert_eq!(
        reloaded.base.get_extra("pretrained_from"),
        Some(&json!("timm/van_b0"))
    );
}

#[test]
fn with_extra_on_a_declared_key_sets_the_field() -> anyhow::Result<()> {
    let cfg = VanConfigBuilder::new()
        .with_extra("num_channels", 5)
        .with_extra("num_labels", 7)
        .with_extra("image_size", "large")
        .with_extra("dataset", "imagenet-1k")
        .build();

    assert_eq!(cfg.num_channels, 5);
    assert_eq!(cfg.image_size, 224);
    assert_eq!(cfg.base.num_labels(), 7);
    assert_eq!(cfg.base.extra.len(), 1);
    assert_eq!(cfg.base.get_extra("dataset"), Some(&json!("imagenet-1k")));

    let reloaded = VanConfig::from_json_str(&cfg.to_json_string(true)?)?;
    assert_eq!(reloaded, cfg);
    Ok(())
}

#[test]
fn round_trip_with_many_overrides() -> anyhow::Result<()> {
    let cfg = VanConfigBuilder::new()
        .with_num_channels(1)
        .with_patch_sizes(vec![7, 3, 3])
        .with_strides(vec![4, 2, 2])
        .with_hidden_sizes(vec![16, 32, 64])
        .with_depths(vec![1, 1, 2])
        .with_mlp_expansions(vec![4, 4, 4])
        .with_hidden_act("gelu_new")
        .with_initializer_range(0.05)
        .with_layer_norm_eps(1e-12)
        .with_layer_scale_init_value(1e-6)
        .with_drop_path_rate(0.3)
        .with_dropout_rate(0.25)
        .with_image_size(96)
        .with_architectures(["VanForImageClassification"])
        .with_num_labels(10)
        .with_extra("notes", json!({"source": "unit test"}))
        .build();

    assert_eq!(cfg.hidden_act, HiddenAct::Named(Activation::GeluNew));

    let from_dict = VanConfig::from_dict(Value::Object(cfg.to_dict()?))?;
    assert_eq!(from_dict, cfg);

    let from_full_json = VanConfig::from_json_str(&cfg.to_json_string(false)?)?;
    assert_eq!(from_full_json, cfg);

    let from_diff_json = VanConfig::from_json_str(&cfg.to_json_string(true)?)?;
    assert_eq!(from_diff_json, cfg);
    Ok(())
}

#[test]
fn custom_activation_serializes_by_name() -> anyhow::Result<()> {
    let cfg = VanConfigBuilder::new()
        .with_custom_activation("hard_tanh", |x| x.clamp(-1.0, 1.0))
        .build();
    match &cfg.hidden_act {
        HiddenAct::Custom(custom) => assert_eq!(custom.apply(3.0), 1.0),
        other => panic!("expected a custom activation, got {other:?}"),
    }

    let dict = cfg.to_dict()?;
    assert_eq!(dict["hidden_act"], json!("hard_tanh"));

    let reloaded = VanConfig::from_dict(Value::Object(dict))?;
    assert_eq!(reloaded.hidden_act, HiddenAct::Other("hard_tanh".to_string()));
    Ok(())
}

#[test]
fn save_then_load_pretrained_directory() -> anyhow::Result<()> {
    let dir = temp_model_dir("save-load");
    let cfg = VanConfigBuilder::new()
        .with_depths(vec![2, 2, 4, 2])
        .with_extra("license", "apache-2.0")
        .build();
    let path = cfg.save_pretrained(&dir)?;

    let written: Value = serde_json::from_str(&std::fs::read_to_string(&path)?)?;
    assert_eq!(
        written,
        json!({"model_type": "van", "depths": [2, 2, 4, 2], "license": "apache-2.0"})
    );

    let model_id = dir.to_str().unwrap().to_string();
    let loaded = VanConfig::from_pretrained(&model_id, &HubOptions::default())?;
    let auto = AutoConfig::from_pretrained(&model_id, &HubOptions::default())?;
    std::fs::remove_dir_all(&dir)?;

    assert_eq!(loaded.depths, vec![2, 2, 4, 2]);
    assert_eq!(loaded.base.name_or_path, model_id);
    assert_eq!(auto.config_type(), ConfigType::Van);
    assert_eq!(auto.as_van(), Some(&loaded));
    Ok(())
}

#[test]
fn json_file_round_trip() -> anyhow::Result<()> {
    let dir = temp_model_dir("json-file");
    std::fs::create_dir_all(&dir)?;
    let path = dir.join("van.json");

    let cfg = VanConfigBuilder::new().with_image_size(256).build();
    cfg.to_json_file(&path, false)?;
    let loaded = VanConfig::from_json_file(&path)?;
    std::fs::remove_dir_all(&dir)?;

    assert_eq!(loaded, cfg);
    Ok(())
}

#[test]
fn auto_config_by_model_type() -> anyhow::Result<()> {
    let cfg = AutoConfig::from_json_str(r#"{"model_type": "van", "image_size": 512}"#)?;
    assert_eq!(cfg.config_type(), ConfigType::Van);
    assert_eq!(cfg.as_van().map(|c| c.image_size), Some(512));
    Ok(())
}
