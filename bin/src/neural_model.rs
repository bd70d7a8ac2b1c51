use forecast_lib::forecast_model::{EpochLoss, ForecastModel};
use forecast_lib::hyperparams::NetworkDimensions;
use forecast_lib::market_data::{DailyClose, HistoryMetadata};
use forecast_lib::scaling::ScaleParams;
use forecast_lib::utils;
use anyhow::anyhow;
use ndarray::{Array1, Array2, Axis};
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;
use rand::rngs::StdRng;
use rand::SeedableRng;

const LOSS_REPORT_INTERVAL : u32 = 100;

// One hidden layer with tanh activation and a linear output, trained with
// full-batch gradient descent on the mean squared error of the scaled data.
#[derive(Debug)]
struct RegressionNetwork {
    weights_hidden : Array2<f64>,
    bias_hidden : Array1<f64>,
    weights_output : Array2<f64>,
    bias_output : Array1<f64>,
    hidden_activations : Array2<f64>,
    outputs : Array1<f64>
}

impl RegressionNetwork {
    fn new(input_size : usize, hidden_size : usize, rng : &mut StdRng) -> RegressionNetwork {
        let hidden_scale = (6.0 / (input_size + hidden_size) as f64).sqrt();
        let output_scale = (6.0 / (hidden_size + 1) as f64).sqrt();

        RegressionNetwork {
            weights_hidden : Array2::random_using((input_size, hidden_size),
                Uniform::new(-hidden_scale, hidden_scale), rng),
            bias_hidden : Array1::zeros(hidden_size),
            weights_output : Array2::random_using((hidden_size, 1),
                Uniform::new(-output_scale, output_scale), rng),
            bias_output : Array1::zeros(1),
            hidden_activations : Array2::zeros((0, hidden_size)),
            outputs : Array1::zeros(0)
        }
    }

    fn forward(&mut self, inputs : &Array2<f64>) -> Array1<f64> {
        let hidden = (inputs.dot(&self.weights_hidden) + &self.bias_hidden).mapv(f64::tanh);
        let outputs = (hidden.dot(&self.weights_output) + &self.bias_output).column(0).to_owned();

        self.hidden_activations = hidden;
        self.outputs = outputs.clone();
        outputs
    }

    // Gradient descent step against the activations cached by the last
    // forward call over the same inputs.
    fn backward(&mut self, inputs : &Array2<f64>, targets : &Array1<f64>, learning_rate : f64) {
        let batch_size = inputs.nrows() as f64;

        let output_delta = (&self.outputs - targets) * (2.0 / batch_size);
        let output_delta = output_delta.insert_axis(Axis(1));
        let weights_output_grad = self.hidden_activations.t().dot(&output_delta);
        let bias_output_grad = output_delta.sum_axis(Axis(0));

        let hidden_delta = output_delta.dot(&self.weights_output.t())
            * &self.hidden_activations.mapv(|h| 1.0 - h * h);
        let weights_hidden_grad = inputs.t().dot(&hidden_delta);
        let bias_hidden_grad = hidden_delta.sum_axis(Axis(0));

        self.weights_output.scaled_add(-learning_rate, &weights_output_grad);
        self.bias_output.scaled_add(-learning_rate, &bias_output_grad);
        self.weights_hidden.scaled_add(-learning_rate, &weights_hidden_grad);
        self.bias_hidden.scaled_add(-learning_rate, &bias_hidden_grad);
    }
}

#[derive(Debug)]
struct TrainingArtifacts {
    network : RegressionNetwork,
    feature_scale : ScaleParams,
    target_scale : ScaleParams,
    time_step : usize
}

pub struct NeuralForecastModel {
    seed : u64,
    training_artifacts : Option<TrainingArtifacts>
}

impl NeuralForecastModel {
    pub fn new(seed : u64) -> NeuralForecastModel {
        NeuralForecastModel { seed, training_artifacts : None }
    }

    fn prepare_training_data(dataset : &[(Vec<f64>, f64)], time_step : usize)
            -> anyhow::Result<(Array2<f64>, Array1<f64>, ScaleParams, ScaleParams)> {
        let mut feature_values = Vec::new();
        let mut target_values = Vec::new();
        for (window, target) in dataset {
            feature_values.extend_from_slice(window);
            target_values.push(*target);
        }

        let feature_scale = ScaleParams::fit(&feature_values)?;
        let target_scale = ScaleParams::fit(&target_values)?;

        let inputs = Array2::from_shape_vec((dataset.len(), time_step),
            feature_scale.scale_all(&feature_values))?;
        let targets = Array1::from(target_scale.scale_all(&target_values));

        Ok((inputs, targets, feature_scale, target_scale))
    }
}

impl ForecastModel for NeuralForecastModel {

    type TrainingParams = (f64, u32);

    fn train(&mut self, history : &Vec<DailyClose>, _history_metadata : &HistoryMetadata,
             dims : &NetworkDimensions,
             &(learning_rate, num_epochs) : &Self::TrainingParams) -> anyhow::Result<Vec<EpochLoss>> {
        let closes : Vec<f64> = history.iter().map(|s| s.close).collect();
        let dataset = utils::extract_windows(&closes, dims.time_step)?;

        let (inputs, targets, feature_scale, target_scale) =
            NeuralForecastModel::prepare_training_data(&dataset, dims.time_step)?;
        let target_values = targets.to_vec();

        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut network = RegressionNetwork::new(dims.time_step, dims.hidden_size, &mut rng);

        let mut trace = Vec::new();
        for epoch in 0..num_epochs {
            let predicted = network.forward(&inputs);
            if epoch % LOSS_REPORT_INTERVAL == 0 {
                let loss = utils::mean_squared_error(&target_values, &predicted.to_vec());
                eprintln!("Epoch {}, Loss: {:.4}", epoch, loss);
                trace.push(EpochLoss { epoch, loss });
            }
            network.backward(&inputs, &targets, learning_rate);
        }

        self.training_artifacts = Some(TrainingArtifacts { network, feature_scale, target_scale,
            time_step : dims.time_step });
        Ok(trace)
    }

    fn predict(&mut self, window : &Vec<f64>) -> anyhow::Result<f64> {
        let artifacts = self.training_artifacts.as_mut().ok_or(anyhow!("Model has not been trained yet"))?;

        if window.len() != artifacts.time_step {
            return Err(anyhow!("Input window length should fit exactly the model input size"));
        }

        let inputs = Array2::from_shape_vec((1, artifacts.time_step),
            artifacts.feature_scale.scale_all(window))?;
        let outputs = artifacts.network.forward(&inputs);

        Ok(artifacts.target_scale.unscale(outputs[0]))
    }
}
