use criterion::Criterion;
use std::hint::black_box;
use solar_yield_model::{ModelConfig, Parameters, SolarModel};
use solar_yield_model_test_util::{SYNTHETIC_YEAR, SYNTHETIC_YEAR_PARAMETERS};

fn year_model(config: ModelConfig) -> SolarModel {
    SolarModel::new(config, SYNTHETIC_YEAR.observations()).unwrap()
}

pub fn bench_ln_posterior(c: &mut Criterion) {
    for (name, config) in [
        ("soft-min", ModelConfig::soft_min()),
        ("tanh", ModelConfig::tanh()),
    ] {
        let model = year_model(config);
        let params = Parameters {
            saturation_control: Parameters::default_init(model.config().saturation())
                .saturation_control,
            ..*SYNTHETIC_YEAR_PARAMETERS
        };
        let u = model.unconstrain(&params).unwrap();
        c.bench_function(&format!("ln_posterior, one year, {name}"), |b| {
            b.iter(|| model.ln_posterior(black_box(&params)));
        });
        c.bench_function(&format!("ln_posterior_unconstrained, one year, {name}"), |b| {
            b.iter(|| model.ln_posterior_unconstrained(black_box(&u)));
        });
    }
}

pub fn bench_derived(c: &mut Criterion) {
    let model = year_model(ModelConfig::soft_min());
    c.bench_function("derived quantities, one year", |b| {
        b.iter(|| model.derived(black_box(&SYNTHETIC_YEAR_PARAMETERS)));
    });
}
